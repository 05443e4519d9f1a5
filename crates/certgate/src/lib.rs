//! Certgate Server
//!
//! HTTP gateway in front of a certificate authority. It:
//! - Routes certificate requests to the CA engine
//! - Hands the CA a sanitized, read-only parameter set
//! - Translates CA outcomes into the exact responses clients expect
//! - Reports CA health through a self-test probe
//!
//! The gateway performs no cryptography, makes no policy decisions and
//! stores nothing. It classifies and forwards.
//!
//! ## API Endpoints
//!
//! ### Gateway
//! - `GET /ping` - Liveness check, always `PONG`
//! - `POST /certificate/{cn}` - Sign a CSR, `303` to the certificate on success
//! - `GET /certificate/{cn}` - Fetch a PEM certificate
//! - `DELETE /certificate/{cn}` - Remove a certificate
//!
//! Other methods on those paths answer `405`, any other path `501`.
//!
//! ### Health
//! - `GET /test` - Run the self-test probe, `200` or `503`
//!
//! The health router only answers probe requests: any other method on
//! `/test` is `405`.
//!
//! ## Request parameters
//!
//! Query string, then a `application/x-www-form-urlencoded` or
//! `multipart/form-data` body, then the path-derived `cn` and the caller's
//! `ip`. Input that cannot be decoded exactly is `400`.

pub mod api;
pub mod config;
pub mod engine;

pub use api::handlers::AppState;
pub use api::reply::{translate, Reply};
pub use api::{create_health_router, create_router};
pub use config::{ConfigError, GatewayConfig, SelfTestConfig};
pub use engine::{EngineSelfTest, MemoryEngine};
