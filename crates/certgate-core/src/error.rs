//! Error types for certgate

use thiserror::Error;

/// A required request parameter was absent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing parameter: {key}")]
pub struct MissingParam {
    /// Wire name of the missing parameter
    pub key: String,
}

/// Attempted to build a denial or error reason from an empty string
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("outcome reason must not be empty")]
pub struct EmptyReason;

/// Errors raised by a self-test probe itself, as opposed to a failed report
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The CA could not be exercised at all
    #[error("CA unavailable: {0}")]
    Unavailable(String),

    /// The probe's own fixture (test CSR, subject) is unusable
    #[error("Invalid probe fixture: {0}")]
    Fixture(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}
