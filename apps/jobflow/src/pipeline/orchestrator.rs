//! Orchestrator: runs one batch from inputs to a populated ledger.
//!
//! Flow: validate inputs → init ledger → find_postings → (dedup) →
//!       tailor each posting → allocate + append each tailored resume.
//!
//! Adapters are injected; nothing is discovered from ambient state.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::filing::{ApplicationAllocator, Ledger};
use crate::models::{ApplicationRecord, JobPosting, TailoredResume};
use crate::pipeline::{
    DedupPolicy, FailurePolicy, RunError, RunOptions, RunParams, RunReport, SkippedJob, Stage,
};
use crate::resume::load_resume;
use crate::search::JobSource;
use crate::tailoring::ResumeTailor;

pub struct Orchestrator {
    jobs: Arc<dyn JobSource>,
    tailor: Arc<dyn ResumeTailor>,
    allocator: ApplicationAllocator,
    ledger_path: PathBuf,
    options: RunOptions,
    cancel: CancellationToken,
}

#[derive(Default)]
struct TailorOutcome {
    tailored: Vec<TailoredResume>,
    skipped: Vec<SkippedJob>,
    cancelled: bool,
}

impl Orchestrator {
    pub fn new(
        jobs: Arc<dyn JobSource>,
        tailor: Arc<dyn ResumeTailor>,
        allocator: ApplicationAllocator,
        ledger_path: impl Into<PathBuf>,
        options: RunOptions,
    ) -> Self {
        Self {
            jobs,
            tailor,
            allocator,
            ledger_path: ledger_path.into(),
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the run's cancellation token, e.g. with one tied to Ctrl-C.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the run from issuing further external calls.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs every stage in order. On failure, the error names the stage and the item.
    pub async fn run(&self, params: &RunParams) -> Result<RunReport, RunError> {
        // INIT
        enter(Stage::Init);
        let resume_text =
            validate_inputs(params).map_err(|e| RunError::new(Stage::Init, None, e))?;
        let ledger =
            Ledger::init(&self.ledger_path).map_err(|e| RunError::new(Stage::Init, None, e))?;

        // RESEARCH
        enter(Stage::Research);
        let postings = self.research(params).await?;
        let postings_found = postings.len();
        let used_fallback = postings.iter().any(JobPosting::is_placeholder);
        let (postings, duplicates_dropped) = match self.options.dedup {
            DedupPolicy::None => (postings, 0),
            DedupPolicy::ByLink => dedupe_by_link(postings),
        };
        if duplicates_dropped > 0 {
            info!("Dropped {duplicates_dropped} duplicate postings");
        }
        if postings.is_empty() {
            return Err(RunError::new(
                Stage::Research,
                None,
                PipelineError::search("job source returned no postings"),
            ));
        }

        // TAILOR
        enter(Stage::Tailor);
        let outcome = self.tailor_all(&resume_text, &postings).await?;
        let cancelled = outcome.cancelled;

        // FILE
        enter(Stage::File);
        let records = self.file_all(&ledger, outcome.tailored)?;

        if cancelled {
            warn!(
                "Run cancelled; filed {} of {} postings before stopping",
                records.len(),
                postings.len()
            );
            return Err(RunError::new(Stage::Tailor, None, PipelineError::Cancelled));
        }

        enter(Stage::Done);
        Ok(RunReport {
            postings_found,
            used_fallback,
            duplicates_dropped,
            skipped: outcome.skipped,
            ledger_path: ledger.path().to_path_buf(),
            ledger_rows: ledger.rows(),
            records,
        })
    }

    async fn research(&self, params: &RunParams) -> Result<Vec<JobPosting>, RunError> {
        if self.cancel.is_cancelled() {
            return Err(RunError::new(Stage::Research, None, PipelineError::Cancelled));
        }

        let call = self.jobs.find_postings(&params.topic, &params.location);
        match timeout(self.options.search_deadline, call).await {
            Ok(Ok(postings)) => {
                info!("RESEARCH produced {} postings", postings.len());
                Ok(postings)
            }
            Ok(Err(e)) => Err(RunError::new(Stage::Research, None, e)),
            Err(_) => Err(RunError::new(
                Stage::Research,
                None,
                PipelineError::search(format!(
                    "job source timed out after {}s",
                    self.options.search_deadline.as_secs()
                )),
            )),
        }
    }

    async fn tailor_all(
        &self,
        resume_text: &str,
        postings: &[JobPosting],
    ) -> Result<TailorOutcome, RunError> {
        let mut results = stream::iter(postings)
            .map(|job| self.tailor_one(resume_text, job))
            .buffered(self.options.tailor_concurrency.max(1));

        let mut outcome = TailorOutcome::default();

        while let Some((job, result)) = results.next().await {
            match result {
                Ok(tailored) => outcome.tailored.push(tailored),
                Err(PipelineError::Cancelled) => outcome.cancelled = true,
                Err(e) => match self.options.on_tailor_failure {
                    FailurePolicy::Abort => {
                        return Err(RunError::new(Stage::Tailor, Some(job.label()), e));
                    }
                    FailurePolicy::Skip => {
                        warn!("Skipping {}: {}", job.label(), e);
                        outcome.skipped.push(SkippedJob {
                            job: job.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        if outcome.tailored.is_empty() && !outcome.cancelled {
            return Err(RunError::new(
                Stage::Tailor,
                None,
                PipelineError::generation(format!(
                    "all {} postings failed tailoring",
                    postings.len()
                )),
            ));
        }

        info!(
            "TAILOR produced {} resumes ({} skipped)",
            outcome.tailored.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    async fn tailor_one<'a>(
        &self,
        resume_text: &str,
        job: &'a JobPosting,
    ) -> (&'a JobPosting, Result<TailoredResume, PipelineError>) {
        // Postings not yet started are never sent once the run is cancelled.
        if self.cancel.is_cancelled() {
            return (job, Err(PipelineError::Cancelled));
        }

        let result = match timeout(
            self.options.tailor_deadline,
            self.tailor.tailor(resume_text, job),
        )
        .await
        {
            Ok(Ok(tailored)) if tailored.text.trim().is_empty() => Err(PipelineError::generation(
                "tailoring returned an empty resume",
            )),
            Ok(Ok(tailored)) => {
                if tailored.text.trim() == resume_text.trim() {
                    warn!("Tailored resume for {} matches the original", job.label());
                }
                Ok(tailored)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PipelineError::generation(format!(
                "tailoring timed out after {}s",
                self.options.tailor_deadline.as_secs()
            ))),
        };

        (job, result)
    }

    fn file_all(
        &self,
        ledger: &Ledger,
        tailored: Vec<TailoredResume>,
    ) -> Result<Vec<ApplicationRecord>, RunError> {
        let mut records = Vec::with_capacity(tailored.len());

        for resume in tailored {
            let label = resume.source_job.label();
            let record = self
                .allocator
                .allocate(resume)
                .map_err(|e| RunError::new(Stage::File, Some(label.clone()), e))?;
            ledger.append(&record).map_err(|e| {
                RunError::new(
                    Stage::File,
                    Some(format!("{label} (record {})", record.id)),
                    e,
                )
            })?;
            records.push(record);
        }

        info!(
            "FILE wrote {} records under {}",
            records.len(),
            self.allocator.root().display()
        );
        Ok(records)
    }
}

fn enter(stage: Stage) {
    info!(%stage, "Entering stage");
}

/// Checks run parameters and reads the resume. Everything here fails before any stage runs.
fn validate_inputs(params: &RunParams) -> Result<String, PipelineError> {
    if params.topic.trim().is_empty() {
        return Err(PipelineError::InputValidation(
            "topic cannot be empty".to_string(),
        ));
    }
    if params.location.trim().is_empty() {
        return Err(PipelineError::InputValidation(
            "location cannot be empty".to_string(),
        ));
    }
    if params.resume_path.as_os_str().is_empty() {
        return Err(PipelineError::InputValidation(
            "resume_path cannot be empty".to_string(),
        ));
    }
    load_resume(&params.resume_path)
}

/// Keeps the first posting for each link. Returns the survivors and how many were dropped.
fn dedupe_by_link(postings: Vec<JobPosting>) -> (Vec<JobPosting>, usize) {
    let before = postings.len();
    let mut seen = HashSet::new();
    let kept: Vec<JobPosting> = postings
        .into_iter()
        .filter(|p| seen.insert(canonical_link(&p.link)))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

fn canonical_link(link: &str) -> String {
    link.trim().trim_end_matches('/').to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
