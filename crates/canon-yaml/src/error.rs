//! Error types for loading and dumping ordered YAML.

use std::path::PathBuf;

use thiserror::Error;

use crate::Context;

/// Result type alias for canon-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or dumping a document.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed YAML text, reported by the scanner.
    #[error("{message} in {source_name}, line {line}, column {column}")]
    Syntax {
        message: String,
        source_name: String,
        line: usize,
        column: usize,
    },

    /// A mapping whose keys are not in the order required by the active policy.
    #[error("keys out of order: expected {expected} got {actual} at {context}")]
    OrderViolation {
        expected: String,
        actual: String,
        context: Context,
    },

    /// An included file could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include chain that leads back to a file still being loaded.
    #[error("include cycle: {}", format_chain(chain))]
    IncludeCycle { chain: Vec<PathBuf> },

    /// Well-formed YAML that cannot be turned into a document tree.
    #[error("{message} at {context}")]
    InvalidStructure { message: String, context: Context },

    /// The emitter refused a value.
    #[error("unable to emit YAML: {message}")]
    Emit { message: String },

    /// An order policy flag that is none of `true`, `false` or `dns`.
    #[error("unrecognized order policy '{0}' (expected true, false or dns)")]
    InvalidPolicy(String),
}

impl Error {
    /// The provenance of the failing mapping or node, when there is one.
    pub fn context(&self) -> Option<&Context> {
        match self {
            Error::OrderViolation { context, .. } | Error::InvalidStructure { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    pub(crate) fn syntax(err: &yaml_rust2::ScanError, source_name: &str) -> Self {
        let marker = err.marker();
        Error::Syntax {
            message: err.info().to_string(),
            source_name: source_name.to_string(),
            line: marker.line(),
            column: marker.col() + 1,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, context: Context) -> Self {
        Error::InvalidStructure {
            message: message.into(),
            context,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<yaml_rust2::EmitError> for Error {
    fn from(err: yaml_rust2::EmitError) -> Self {
        Error::Emit {
            message: err.to_string(),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Emit {
            message: err.to_string(),
        }
    }
}
