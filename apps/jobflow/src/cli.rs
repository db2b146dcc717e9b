use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, RunSettings};
use crate::pipeline::{DedupPolicy, FailurePolicy, RunOptions, RunParams};

/// Find job postings, tailor a resume for each, and file every application.
#[derive(Debug, Parser)]
#[command(name = "jobflow", version, about)]
pub struct Cli {
    /// What to search for, e.g. "Agentic AI"
    pub topic: String,

    /// Where to search, e.g. "Gurugram"
    pub location: String,

    /// Path to the original resume (.txt or .pdf)
    pub resume_path: PathBuf,

    /// Directory that receives jobs.csv and one folder per application
    #[arg(long, default_value = "applications")]
    pub applications_dir: PathBuf,

    /// What to do when tailoring fails for one posting
    #[arg(long, value_enum, default_value_t = TailorFailure::Abort)]
    pub on_tailor_failure: TailorFailure,

    /// Drop postings whose link already appeared in this run
    #[arg(long)]
    pub dedupe: bool,

    /// Maximum tailoring calls in flight
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=16))]
    pub concurrency: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TailorFailure {
    Abort,
    Skip,
}

impl Cli {
    pub fn run_params(&self) -> RunParams {
        RunParams {
            topic: self.topic.clone(),
            location: self.location.clone(),
            resume_path: self.resume_path.clone(),
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            applications_dir: self.applications_dir.clone(),
        }
    }

    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            on_tailor_failure: match self.on_tailor_failure {
                TailorFailure::Abort => FailurePolicy::Abort,
                TailorFailure::Skip => FailurePolicy::Skip,
            },
            dedup: if self.dedupe {
                DedupPolicy::ByLink
            } else {
                DedupPolicy::None
            },
            tailor_concurrency: usize::from(self.concurrency),
            search_deadline: config.search_deadline(),
            tailor_deadline: config.tailor_deadline(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments_and_defaults() {
        let cli = Cli::try_parse_from(["jobflow", "Agentic AI", "Gurugram", "res.txt"]).unwrap();
        assert_eq!(cli.topic, "Agentic AI");
        assert_eq!(cli.location, "Gurugram");
        assert_eq!(cli.resume_path, PathBuf::from("res.txt"));
        assert_eq!(cli.applications_dir, PathBuf::from("applications"));
        assert_eq!(cli.on_tailor_failure, TailorFailure::Abort);
        assert!(!cli.dedupe);
        assert_eq!(cli.concurrency, 1);
    }

    #[test]
    fn test_policy_flags() {
        let cli = Cli::try_parse_from([
            "jobflow",
            "Rust",
            "Pune",
            "cv.pdf",
            "--on-tailor-failure",
            "skip",
            "--dedupe",
            "--concurrency",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.on_tailor_failure, TailorFailure::Skip);
        assert!(cli.dedupe);
        assert_eq!(cli.concurrency, 4);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result =
            Cli::try_parse_from(["jobflow", "Rust", "Pune", "cv.txt", "--concurrency", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_resume_path_is_rejected() {
        assert!(Cli::try_parse_from(["jobflow", "Rust", "Pune"]).is_err());
    }
}
