// src/error.rs

//! Error types for recipe parsing, graph building and resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a recipe into a build plan
///
/// Every variant renders as a single line that starts with the error kind,
/// followed by the offending field or dependency.
#[derive(Error, Debug)]
pub enum Error {
    /// An operator or version token could not be parsed
    #[error("MalformedConstraint: '{input}': {reason}")]
    MalformedConstraint { input: String, reason: String },

    /// Two constraints on the same dependency can never hold together
    #[error("DuplicateIncompatibleConstraint: {name} requires both {first} and {second}")]
    DuplicateIncompatibleConstraint {
        name: String,
        first: String,
        second: String,
    },

    /// No available version satisfies the constraints on a dependency
    #[error("UnsatisfiableConstraint: {name} ({constraints})")]
    UnsatisfiableConstraint { name: String, constraints: String },

    /// A required manifest field is absent or empty
    #[error("MissingField: {0}")]
    MissingField(String),

    /// A manifest field is present but unusable
    #[error("InvalidField: {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The manifest or catalog is not well-formed YAML, TOML or JSON
    #[error("ParseError: {0}")]
    Parse(String),

    #[error("IoError: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Name of the error kind, as printed at the start of the diagnostic
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedConstraint { .. } => "MalformedConstraint",
            Error::DuplicateIncompatibleConstraint { .. } => "DuplicateIncompatibleConstraint",
            Error::UnsatisfiableConstraint { .. } => "UnsatisfiableConstraint",
            Error::MissingField(_) => "MissingField",
            Error::InvalidField { .. } => "InvalidField",
            Error::Parse(_) => "ParseError",
            Error::Io { .. } => "IoError",
        }
    }

    pub(crate) fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedConstraint {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
