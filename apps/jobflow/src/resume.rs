//! Reads the candidate's original resume from disk.
//!
//! `.pdf` files are converted with pdf-extract; everything else is read as UTF-8 text.

use std::path::Path;

use crate::errors::PipelineError;

/// Loads and validates the original resume. Missing, unreadable or blank files are invalid input.
pub fn load_resume(path: &Path) -> Result<String, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::InputValidation(format!(
            "resume file {} does not exist or is not a file",
            path.display()
        )));
    }

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path).map_err(|e| {
            PipelineError::InputValidation(format!(
                "could not extract text from {}: {e}",
                path.display()
            ))
        })?
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            PipelineError::InputValidation(format!(
                "could not read resume {}: {e}",
                path.display()
            ))
        })?
    };

    if text.trim().is_empty() {
        return Err(PipelineError::InputValidation(format!(
            "resume {} is empty",
            path.display()
        )));
    }

    Ok(text)
}
