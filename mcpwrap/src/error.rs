//! Error types for the wrapping pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for wrapping operations.
pub type Result<T> = std::result::Result<T, WrapError>;

/// Errors that can occur while building or emitting a command catalog.
#[derive(Error, Debug)]
pub enum WrapError {
    /// The requested target SDK version is not in the supported set.
    #[error("unsupported mcp sdk version {requested:?} (supported: {})", supported.join(", "))]
    UnsupportedVersion {
        requested: String,
        supported: Vec<String>,
    },

    /// Two callables resolved to the same command name.
    #[error("duplicate command name: {0}")]
    DuplicateCommandName(String),

    /// A callable's parameters could not be described.
    #[error("cannot derive a signature for `{callable}`: {reason}")]
    UnsignaturableCallable { callable: String, reason: String },

    /// The output destination could not be opened or written.
    #[error("cannot write generated source to {destination}: {source}")]
    OutputResource {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// A library manifest could not be read or parsed.
    #[error("invalid library manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Source template failed to render.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The MCP runtime failed to start or stopped abnormally.
    #[error("server error: {0}")]
    Serve(String),
}

impl WrapError {
    pub(crate) fn unsignaturable(callable: &str, reason: impl Into<String>) -> Self {
        Self::UnsignaturableCallable {
            callable: callable.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn output(destination: impl Into<String>, source: std::io::Error) -> Self {
        Self::OutputResource {
            destination: destination.into(),
            source,
        }
    }
}
