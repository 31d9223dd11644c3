//! Unified error type for the taskyard workspace.

use std::path::PathBuf;

use thiserror::Error;

use crate::path::ConfigPath;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum TaskyardError {
    /// A required field was absent when populating a resource.
    #[error("Error at {path}: missing required field \"{field}\"")]
    MissingField {
        /// Path of the resource being populated.
        path: ConfigPath,
        /// Name of the missing field.
        field: String,
    },

    /// A referenced resource is missing or of the wrong kind.
    #[error("Error at {path}: {message}")]
    Reference {
        /// Path of the field holding the reference.
        path: ConfigPath,
        /// Human-readable description of the failure.
        message: String,
    },

    /// A variable expression could not be substituted.
    #[error("failed to resolve \"{expression}\": {message}")]
    Resolution {
        /// The expression that failed to resolve.
        expression: String,
        /// Why resolution failed.
        message: String,
    },

    /// A raw document value had an unexpected type.
    #[error("{}must be a {expected}, not {found}", location(.path.as_ref()))]
    Type {
        /// Field holding the value, once the loader knows it.
        path: Option<ConfigPath>,
        /// Expected value type.
        expected: &'static str,
        /// Type that was actually found.
        found: &'static str,
    },

    /// A shell-quoted string could not be split into words.
    #[error("{}failed to parse command {input:?}: {message}", location(.path.as_ref()))]
    Parse {
        /// Field holding the command, once the loader knows it.
        path: Option<ConfigPath>,
        /// The offending input, verbatim.
        input: String,
        /// Description of the quoting problem.
        message: String,
    },

    /// The document itself is malformed.
    #[error("Error at {path}: {message}")]
    Document {
        /// Path of the malformed entry.
        path: ConfigPath,
        /// Description of the problem.
        message: String,
    },

    /// The document is not valid YAML.
    #[error("invalid document: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization of output failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl TaskyardError {
    /// Builds a [`TaskyardError::Reference`] at `path`.
    pub fn reference(path: ConfigPath, message: impl Into<String>) -> Self {
        Self::Reference {
            path,
            message: message.into(),
        }
    }

    /// Builds a [`TaskyardError::Document`] at `path`.
    pub fn document(path: ConfigPath, message: impl Into<String>) -> Self {
        Self::Document {
            path,
            message: message.into(),
        }
    }

    /// Attaches `at` to a [`TaskyardError::Type`] or
    /// [`TaskyardError::Parse`] raised without one. Other errors already
    /// carry their location and are returned unchanged.
    #[must_use]
    pub fn at(self, at: ConfigPath) -> Self {
        match self {
            Self::Type {
                path: None,
                expected,
                found,
            } => Self::Type {
                path: Some(at),
                expected,
                found,
            },
            Self::Parse {
                path: None,
                input,
                message,
            } => Self::Parse {
                path: Some(at),
                input,
                message,
            },
            other => other,
        }
    }

    /// Returns the document path attached to the error, if any.
    #[must_use]
    pub const fn path(&self) -> Option<&ConfigPath> {
        match self {
            Self::MissingField { path, .. }
            | Self::Reference { path, .. }
            | Self::Document { path, .. } => Some(path),
            Self::Type { path, .. } | Self::Parse { path, .. } => path.as_ref(),
            Self::Resolution { .. }
            | Self::Yaml { .. }
            | Self::Io { .. }
            | Self::Serialization { .. } => None,
        }
    }
}

fn location(path: Option<&ConfigPath>) -> String {
    path.map_or_else(String::new, |path| format!("Error at {path}: "))
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TaskyardError>;
