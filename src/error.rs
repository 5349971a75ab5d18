//! Error types for content ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading content from disk
#[derive(Debug, Error)]
pub enum ContentError {
    /// A content directory or file could not be read
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content file has malformed or incomplete front-matter
    #[error("invalid front-matter in {}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn validation(path: impl Into<PathBuf>, source: ValidationError) -> Self {
        Self::Validation {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was caused by bad metadata rather than I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Front-matter that does not satisfy the content schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no front-matter block found (expected a leading `---` line)")]
    MissingFrontMatter,

    #[error("front-matter block is not closed by a `---` line")]
    UnterminatedFrontMatter,

    #[error("front-matter is not valid YAML: {0}")]
    Yaml(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
