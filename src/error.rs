//! Error types for schema construction, decoding and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building, decoding, transforming or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    // Schema errors (exit code 2)
    /// No schema kind accepted the JSON object at `path`.
    #[error("structural mismatch at {}: {message}", display_path(path))]
    StructuralMismatch { path: String, message: String },

    /// The JSON object matched a kind but broke one of its constraints.
    #[error("constraint violation at {}: {message}", display_path(path))]
    ConstraintViolation { path: String, message: String },

    /// The operation is not defined for this kind of schema.
    #[error("{operation} is not supported on {kind} schemas")]
    UnsupportedOperation {
        operation: &'static str,
        kind: &'static str,
    },

    #[error("failed to render example: {source}")]
    Render {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

impl SchemaError {
    pub(crate) fn mismatch(path: &str, message: impl Into<String>) -> Self {
        SchemaError::StructuralMismatch {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn violation(path: &str, message: impl Into<String>) -> Self {
        SchemaError::ConstraintViolation {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// JSON pointer to the offending node, for decode-time errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::StructuralMismatch { path, .. }
            | SchemaError::ConstraintViolation { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchemaError::FileNotFound { .. } | SchemaError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
