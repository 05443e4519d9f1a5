//! Collaborator interfaces consumed by the gateway

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::outcome::Outcome;
use crate::params::Params;

/// Certificate authority engine
///
/// Signing, policy evaluation and persistence all live behind this trait.
/// Every call returns exactly one [`Outcome`]; failures are reported as
/// [`Outcome::Error`] rather than through a separate error channel.
///
/// Implementations must be thread-safe. The gateway calls them concurrently
/// and does no serialization of its own.
#[async_trait]
pub trait CaEngine: Send + Sync {
    /// Issue a certificate. `params` carries at least `cn`, `ip` and usually `csr`.
    async fn sign(&self, params: &Params) -> Outcome;

    /// Look up a certificate. A hit carries the PEM-encoded certificate.
    async fn fetch(&self, params: &Params) -> Outcome;

    /// Revoke and forget a certificate
    async fn remove(&self, params: &Params) -> Outcome;
}

/// Result of a self-test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub ok: bool,
    pub message: String,
}

impl TestReport {
    pub fn pass() -> Self {
        Self {
            ok: true,
            message: "OK".to_string(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// End-to-end probe of a CA, used for health reporting
#[async_trait]
pub trait SelfTest: Send + Sync {
    /// Run the probe once.
    ///
    /// `Ok` with a failing report means the CA answered but misbehaved;
    /// `Err` means the probe could not run at all.
    async fn test(&self) -> Result<TestReport, ProbeError>;
}
