//! Application-level errors: orchestration and infrastructure failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors raised by the application services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// No compiler candidate produced a usable syntax tree for a required
    /// input. Raised only after every acquisition strategy was exhausted.
    #[error("could not obtain a syntax tree for {path}")]
    AstUnavailable { path: PathBuf },

    /// A required input file does not exist.
    #[error("required input file missing: {path}")]
    MissingInput { path: PathBuf },

    /// A filesystem operation on an output artifact failed.
    #[error("filesystem operation failed on {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AstUnavailable { path } => vec![
                format!("No compiler produced a syntax tree for {}", path.display()),
                "Check that clang++ or clang is installed and on PATH".into(),
                "Check that the header compiles standalone with the configured include root"
                    .into(),
            ],
            Self::MissingInput { path } => vec![
                format!("The file {} does not exist", path.display()),
                "Check the path passed on the command line or in the config file".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Could not write {}", path.display()),
                "Check permissions on the output directory".into(),
                "Check available disk space".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AstUnavailable { .. } => ErrorCategory::Internal,
            Self::MissingInput { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
