//! In-memory CA engine
//!
//! Development stand-in for a real CA. It keeps whatever the client submitted
//! as `csr` and serves it back as the "certificate" for that subject. No
//! signing, no policy, nothing survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use certgate_core::{CaEngine, Field, Outcome, Params};

/// In-memory CA engine implementation
#[derive(Debug, Default)]
pub struct MemoryEngine {
    certificates: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subjects currently holding a certificate
    pub async fn len(&self) -> usize {
        self.certificates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.certificates.read().await.is_empty()
    }
}

#[async_trait]
impl CaEngine for MemoryEngine {
    async fn sign(&self, params: &Params) -> Outcome {
        let (cn, csr) = match (params.require(&Field::Cn), params.require(&Field::Csr)) {
            (Ok(cn), Ok(csr)) => (cn, csr),
            (Err(e), _) | (_, Err(e)) => return Outcome::error(e.to_string()),
        };
        if csr.trim().is_empty() {
            return Outcome::error("empty csr");
        }

        // One writer per subject at a time: the write lock covers the insert
        let mut certificates = self.certificates.write().await;
        let replaced = certificates
            .insert(cn.to_string(), csr.as_bytes().to_vec())
            .is_some();
        info!(cn = %cn, replaced, "Stored certificate");

        Outcome::hit()
    }

    async fn fetch(&self, params: &Params) -> Outcome {
        let cn = match params.require(&Field::Cn) {
            Ok(cn) => cn,
            Err(e) => return Outcome::error(e.to_string()),
        };

        let certificates = self.certificates.read().await;
        match certificates.get(cn) {
            Some(pem) => Outcome::hit_with(pem.clone()),
            None => Outcome::miss(),
        }
    }

    async fn remove(&self, params: &Params) -> Outcome {
        let cn = match params.require(&Field::Cn) {
            Ok(cn) => cn,
            Err(e) => return Outcome::error(e.to_string()),
        };

        let mut certificates = self.certificates.write().await;
        if certificates.remove(cn).is_some() {
            info!(cn = %cn, "Removed certificate");
            Outcome::hit()
        } else {
            Outcome::miss()
        }
    }
}
