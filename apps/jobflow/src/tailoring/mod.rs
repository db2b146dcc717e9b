//! Resume Tailoring: rewrites the original resume for one posting.
//!
//! All LLM calls go through llm_client; no direct Gemini calls here.

pub mod prompts;

use async_trait::async_trait;
use tracing::info;

use crate::errors::PipelineError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::{JobPosting, TailoredResume};
use crate::tailoring::prompts::{NO_DESCRIPTION, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

/// Stage contract for TAILOR. One call yields exactly one `TailoredResume`.
#[async_trait]
pub trait ResumeTailor: Send + Sync {
    async fn tailor(
        &self,
        resume_text: &str,
        job: &JobPosting,
    ) -> Result<TailoredResume, PipelineError>;
}

/// `ResumeTailor` backed by the generation LLM.
pub struct LlmResumeTailor {
    llm: LlmClient,
}

impl LlmResumeTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeTailor for LlmResumeTailor {
    async fn tailor(
        &self,
        resume_text: &str,
        job: &JobPosting,
    ) -> Result<TailoredResume, PipelineError> {
        if resume_text.trim().is_empty() {
            return Err(PipelineError::InputValidation(
                "resume text cannot be empty".to_string(),
            ));
        }

        let prompt = build_tailor_prompt(resume_text, job);
        let system = format!("{TAILOR_SYSTEM} {PLAIN_TEXT_ONLY_SYSTEM}");

        let text = self
            .llm
            .call_text(&prompt, &system)
            .await
            .map_err(|e| PipelineError::generation(format!("Tailoring LLM call failed: {e}")))?;

        info!(
            "Tailored resume for {} ({} chars)",
            job.label(),
            text.chars().count()
        );

        Ok(TailoredResume {
            source_job: job.clone(),
            text,
        })
    }
}

/// Fills the tailoring template with the resume and the posting's metadata.
pub fn build_tailor_prompt(resume_text: &str, job: &JobPosting) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{job_title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{link}", &job.link)
        .replace(
            "{job_description}",
            job.summary.as_deref().unwrap_or(NO_DESCRIPTION),
        )
        // Resume last so placeholder-like text inside it is never substituted.
        .replace("{resume}", resume_text.trim())
}
