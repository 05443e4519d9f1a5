//! Actions requested of the CA and the outcomes it reports

use std::fmt;

use crate::error::EmptyReason;

/// Certificate action requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Issue a certificate for a CSR
    Sign,
    /// Retrieve a previously issued certificate
    Fetch,
    /// Revoke and forget a certificate
    Remove,
}

impl Action {
    /// All actions, in a stable order
    pub const ALL: [Action; 3] = [Action::Sign, Action::Fetch, Action::Remove];

    /// Lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Sign => "sign",
            Action::Fetch => "fetch",
            Action::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable explanation attached to a denial or an error.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reason(String);

impl Reason {
    /// Used when a CA reports a denial or error without saying why
    pub const UNSPECIFIED: &'static str = "unspecified";

    /// Build a reason, rejecting the empty string
    pub fn new(reason: impl Into<String>) -> Result<Self, EmptyReason> {
        let reason = reason.into();
        if reason.is_empty() {
            return Err(EmptyReason);
        }
        Ok(Self(reason))
    }

    /// Build a reason, substituting [`Reason::UNSPECIFIED`] for the empty string
    pub fn or_unspecified(reason: impl Into<String>) -> Self {
        Self::new(reason).unwrap_or_else(|_| Self(Self::UNSPECIFIED.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Reason {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of a CA operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation succeeded. Fetch carries the PEM-encoded certificate.
    Hit(Option<Vec<u8>>),
    /// No certificate exists for the subject
    Miss,
    /// Policy refused the request
    Denied(Reason),
    /// The CA failed to carry out the request
    Error(Reason),
}

impl Outcome {
    /// A hit with no payload
    pub fn hit() -> Self {
        Outcome::Hit(None)
    }

    /// A hit carrying a payload (usually a PEM certificate)
    pub fn hit_with(payload: impl Into<Vec<u8>>) -> Self {
        Outcome::Hit(Some(payload.into()))
    }

    pub fn miss() -> Self {
        Outcome::Miss
    }

    /// A policy denial. An empty reason becomes [`Reason::UNSPECIFIED`].
    pub fn denied(reason: impl Into<String>) -> Self {
        Outcome::Denied(Reason::or_unspecified(reason))
    }

    /// A CA failure. An empty reason becomes [`Reason::UNSPECIFIED`].
    pub fn error(reason: impl Into<String>) -> Self {
        Outcome::Error(Reason::or_unspecified(reason))
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit(_))
    }

    /// Short tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Hit(_) => "hit",
            Outcome::Miss => "miss",
            Outcome::Denied(_) => "denied",
            Outcome::Error(_) => "error",
        }
    }

    /// Reason carried by a denial or an error
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Outcome::Denied(reason) | Outcome::Error(reason) => Some(reason),
            Outcome::Hit(_) | Outcome::Miss => None,
        }
    }
}
