//! # Certgate Core
//!
//! Domain types shared by the certgate HTTP gateway and the certificate
//! authority engines it fronts.
//!
//! ## Key Concepts
//!
//! - **Action**: what the caller asked of the CA (sign, fetch or remove)
//! - **Outcome**: what the CA reported back (hit, miss, denied or error)
//! - **Params**: the read-only request parameters handed to the CA
//! - **CaEngine**: the collaborator that issues, serves and revokes certificates
//! - **SelfTest**: a synthetic end-to-end probe of the CA used for health reporting
//!
//! ## Parameter Safety
//!
//! Parameter names come straight from untrusted clients. Lookups resolve to a
//! borrowed string for the duration of a single call, and the set of known
//! field names is a closed enum. No table of identifiers grows with the
//! number of distinct keys a client sends.

pub mod engine;
pub mod error;
pub mod outcome;
pub mod params;

pub use engine::{CaEngine, SelfTest, TestReport};
pub use error::{EmptyReason, MissingParam, ProbeError};
pub use outcome::{Action, Outcome, Reason};
pub use params::{Field, ParamKey, Params, ParamsBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
