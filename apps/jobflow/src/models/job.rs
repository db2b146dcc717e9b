use serde::{Deserialize, Serialize};

/// Company name carried by the placeholder posting. Never produced by a real search hit.
pub const PLACEHOLDER_COMPANY: &str = "[placeholder] Tech Corp";
pub const PLACEHOLDER_TITLE: &str = "Sample Job Title";
pub const PLACEHOLDER_LINK: &str = "https://example.com/job/123";

/// A discovered job listing. Identity is structural; no explicit key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub link: String,
    /// Snippet returned by the search backend, used as the job description when tailoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            link: link.into(),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.summary = (!summary.trim().is_empty()).then_some(summary);
        self
    }

    /// The posting returned when search yields nothing usable.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_TITLE, PLACEHOLDER_COMPANY, PLACEHOLDER_LINK)
    }

    pub fn is_placeholder(&self) -> bool {
        self.company == PLACEHOLDER_COMPANY
    }

    /// Short human label used in logs and failure reports.
    pub fn label(&self) -> String {
        format!("'{}' at {}", self.title, self.company)
    }
}

/// A resume variant produced for exactly one posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoredResume {
    pub source_job: JobPosting,
    pub text: String,
}
