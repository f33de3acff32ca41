use std::fmt::{self, Display};
use std::path::PathBuf;

use thiserror::Error;

/// The check an expectation failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    StatusCode,
    ContentType,
    Header(String),
    BodySchema,
    BodyPath(String),
    Absent(String),
}

impl Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::StatusCode => write!(f, "status code"),
            Check::ContentType => write!(f, "content type"),
            Check::Header(name) => write!(f, "header `{name}`"),
            Check::BodySchema => write!(f, "body schema"),
            Check::BodyPath(path) => write!(f, "body path `{path}`"),
            Check::Absent(path) => write!(f, "absent `{path}`"),
        }
    }
}

/// A failed expectation with the values that were compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationFailure {
    pub check: Check,
    pub expected: String,
    pub actual: String,
}

impl ExpectationFailure {
    pub fn new(check: Check, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            check,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl Display for ExpectationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: expected {}, got {}",
            self.check, self.expected, self.actual
        )
    }
}

/// Everything that can fail a single call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("Can't read asset file `{}`: {message}", path.display())]
    AssetRead { path: PathBuf, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unsupported content type `{0}`")]
    UnsupportedContentType(String),

    #[error("Malformed {content_type} body: {message}")]
    MalformedBody {
        content_type: String,
        message: String,
    },

    #[error("Invalid expectation: {0}")]
    InvalidExpectation(String),

    #[error("Expectation failed: {0}")]
    Expectation(ExpectationFailure),

    #[error("Remembered value `{variable}` not found, path: {path}")]
    Capture { variable: String, path: String },
}

impl From<ExpectationFailure> for CallError {
    fn from(failure: ExpectationFailure) -> Self {
        CallError::Expectation(failure)
    }
}

/// Errors raised while discovering and parsing suite files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Can't read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't parse `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid suite file `{}`:\n{violations}", path.display())]
    Invalid { path: PathBuf, violations: String },

    #[error("Suite schema error: {0}")]
    Schema(String),
}

/// Errors raised by reporters when persisting results.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),
}
