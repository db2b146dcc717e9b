// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume tailoring.
pub const TAILOR_SYSTEM: &str = "You are a professional resume editor with a decade of \
    experience optimizing resumes for specific job postings. \
    You return the full rewritten resume as plain text.";

/// Resume tailoring prompt template.
/// Replace: {grounding_instruction}, {resume}, {job_title}, {company}, {link}, {job_description}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Modify this resume to better match the job posting below.

ORIGINAL RESUME:
{resume}

JOB POSTING:
Title: {job_title}
Company: {company}
Link: {link}
Description: {job_description}

RULES:
1. Keep the candidate's name, contact details and section structure
2. Lead each section with the experience most relevant to this posting
3. Use the posting's terminology where the original resume supports it; never keyword-stuff
4. Return the complete resume, not a diff or a list of suggestions"#;

/// Used when the search backend returned no snippet for the posting.
pub const NO_DESCRIPTION: &str = "Not available; infer the focus from the title and company.";
