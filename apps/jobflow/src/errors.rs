use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The external capability a backend failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Search,
    Generation,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Search => f.write_str("search"),
            Backend::Generation => f.write_str("generation"),
        }
    }
}

/// Pipeline-level error taxonomy.
/// Adapters convert their transport errors into one of these at their boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable { backend: Backend, message: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Run cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        PipelineError::BackendUnavailable {
            backend: Backend::Generation,
            message: message.into(),
        }
    }

    pub fn search(message: impl Into<String>) -> Self {
        PipelineError::BackendUnavailable {
            backend: Backend::Search,
            message: message.into(),
        }
    }

    /// Process exit code for this error class.
    ///
    /// 1 invalid input, 2 backend failure, 3 filesystem/ledger failure, 130 cancelled.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InputValidation(_) => 1,
            PipelineError::BackendUnavailable { .. } => 2,
            PipelineError::Filesystem { .. } => 3,
            PipelineError::Cancelled => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_taxonomy() {
        assert_eq!(PipelineError::InputValidation("x".into()).exit_code(), 1);
        assert_eq!(PipelineError::generation("timeout").exit_code(), 2);
        assert_eq!(PipelineError::search("dns").exit_code(), 2);
        let fs = PipelineError::filesystem(
            "applications/jobs.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(fs.exit_code(), 3);
        assert_eq!(PipelineError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_filesystem_error_names_path() {
        let err = PipelineError::filesystem(
            "applications/abc",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("applications/abc"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_backend_error_names_backend() {
        let msg = PipelineError::generation("HTTP 503").to_string();
        assert_eq!(msg, "generation backend unavailable: HTTP 503");
    }
}
