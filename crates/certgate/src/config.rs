//! Server configuration, read from `CERTGATE_*` environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SELF_TEST_CN: &str = "self-test.certgate.invalid";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CERTGATE_PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("CERTGATE_BIND must be an IP address, got {0:?}")]
    InvalidBind(String),

    #[error("CERTGATE_LOG_LEVEL must be one of trace, debug, info, warn, error, got {0:?}")]
    InvalidLogLevel(String),

    #[error("Failed to read self-test CSR from {path}: {source}")]
    SelfTestCsr {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Self-test fixture configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestConfig {
    /// Path to the known-good PEM-encoded test CSR
    pub csr_path: PathBuf,
    /// Subject the test certificate is signed for
    pub cn: String,
}

impl SelfTestConfig {
    pub fn load_csr(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.csr_path).map_err(|source| ConfigError::SelfTestCsr {
            path: self.csr_path.clone(),
            source,
        })
    }
}

/// Gateway server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub log_level: Level,
    /// When set, the health router is mounted at `/test`
    pub self_test: Option<SelfTestConfig>,
}

impl GatewayConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("CERTGATE_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let ip = match var("CERTGATE_BIND") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBind(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let log_level = match var("CERTGATE_LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<Level>()
                .map_err(|_| ConfigError::InvalidLogLevel(raw))?,
            None => Level::INFO,
        };

        let self_test = var("CERTGATE_SELF_TEST_CSR").map(|path| SelfTestConfig {
            csr_path: PathBuf::from(path.trim()),
            cn: var("CERTGATE_SELF_TEST_CN").unwrap_or_else(|| DEFAULT_SELF_TEST_CN.to_string()),
        });

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            log_level,
            self_test,
        })
    }
}
