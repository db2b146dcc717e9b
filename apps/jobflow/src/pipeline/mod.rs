//! Pipeline: drives RESEARCH → TAILOR → FILE for one run.
//!
//! Each stage receives the complete output of the stage before it; nothing streams.
//! The orchestrator is the only place that decides abort-vs-continue.

pub mod orchestrator;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::errors::PipelineError;
use crate::models::{ApplicationRecord, JobPosting};

pub use orchestrator::Orchestrator;

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

/// Run states. Strictly forward: INIT → RESEARCH → TAILOR → FILE → DONE, FAILED from any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Research,
    Tailor,
    File,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "INIT",
            Stage::Research => "RESEARCH",
            Stage::Tailor => "TAILOR",
            Stage::File => "FILE",
            Stage::Done => "DONE",
            Stage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs and policies
// ────────────────────────────────────────────────────────────────────────────

/// Parameters for one run.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub topic: String,
    pub location: String,
    pub resume_path: PathBuf,
}

/// What TAILOR does when a single posting fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail the whole run on the first failure.
    #[default]
    Abort,
    /// Log the failure, record it in the report and continue with the next posting.
    Skip,
}

/// Whether RESEARCH output is deduplicated before tailoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Keep every posting, repeats included.
    #[default]
    None,
    /// Drop postings whose link was already seen in this run; first occurrence wins.
    ByLink,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub on_tailor_failure: FailurePolicy,
    pub dedup: DedupPolicy,
    /// Maximum tailoring calls in flight. 1 runs postings strictly one after another.
    pub tailor_concurrency: usize,
    /// Deadline for the whole RESEARCH call.
    pub search_deadline: Duration,
    /// Deadline for one posting's tailoring, retries included.
    pub tailor_deadline: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            on_tailor_failure: FailurePolicy::Abort,
            dedup: DedupPolicy::None,
            tailor_concurrency: 1,
            search_deadline: Duration::from_secs(35),
            tailor_deadline: Duration::from_secs(370),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// A posting that TAILOR gave up on under `FailurePolicy::Skip`.
#[derive(Debug, Clone)]
pub struct SkippedJob {
    pub job: JobPosting,
    pub reason: String,
}

/// Summary of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub postings_found: usize,
    /// RESEARCH returned the placeholder posting instead of real results.
    pub used_fallback: bool,
    pub duplicates_dropped: usize,
    pub skipped: Vec<SkippedJob>,
    pub records: Vec<ApplicationRecord>,
    pub ledger_path: PathBuf,
    pub ledger_rows: usize,
}

/// A failed run: which stage, which item, and why.
#[derive(Debug, Error)]
pub struct RunError {
    pub stage: Stage,
    pub item: Option<String>,
    #[source]
    pub error: PipelineError,
}

impl RunError {
    pub fn new(stage: Stage, item: Option<String>, error: PipelineError) -> Self {
        Self { stage, item, error }
    }

    pub fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{} stage failed for {}: {}", self.stage, item, self.error),
            None => write!(f, "{} stage failed: {}", self.stage, self.error),
        }
    }
}
