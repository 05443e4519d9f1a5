//! Self-test probe that exercises a CA end to end
//!
//! Signs a fixed, known-good CSR for a fixed test subject, then fetches the
//! resulting certificate back. Both steps must hit.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use certgate_core::{CaEngine, Field, Outcome, Params, ProbeError, SelfTest, TestReport};

/// Address the probe claims to call from
pub const SELF_TEST_IP: &str = "127.0.0.1";

/// Self-test backed by a [`CaEngine`]
pub struct EngineSelfTest {
    engine: Arc<dyn CaEngine>,
    cn: String,
    csr: String,
}

impl EngineSelfTest {
    /// `csr` is the PEM-encoded test request, `cn` the subject it is signed for
    pub fn new(engine: Arc<dyn CaEngine>, cn: impl Into<String>, csr: impl Into<String>) -> Self {
        Self {
            engine,
            cn: cn.into(),
            csr: csr.into(),
        }
    }

    fn params(&self) -> Params {
        Params::builder()
            .insert(Field::Cn, self.cn.as_str())
            .insert(Field::Ip, SELF_TEST_IP)
            .insert(Field::Csr, self.csr.as_str())
            .build()
    }
}

#[async_trait]
impl SelfTest for EngineSelfTest {
    async fn test(&self) -> Result<TestReport, ProbeError> {
        if self.cn.is_empty() {
            return Err(ProbeError::Fixture("test subject is empty".into()));
        }
        if self.csr.trim().is_empty() {
            return Err(ProbeError::Fixture("test CSR is empty".into()));
        }

        let params = self.params();

        let signed = self.engine.sign(&params).await;
        debug!(cn = %self.cn, outcome = signed.kind(), "Self-test sign");
        if !signed.is_hit() {
            return Ok(TestReport::fail(describe("sign", &signed)));
        }

        let fetched = self.engine.fetch(&params).await;
        debug!(cn = %self.cn, outcome = fetched.kind(), "Self-test fetch");
        match fetched {
            Outcome::Hit(Some(pem)) if !pem.is_empty() => Ok(TestReport::pass()),
            Outcome::Hit(_) => Ok(TestReport::fail("fetch: hit without certificate")),
            other => Ok(TestReport::fail(describe("fetch", &other))),
        }
    }
}

fn describe(step: &str, outcome: &Outcome) -> String {
    match outcome.reason() {
        Some(reason) => format!("{step}: {} ({reason})", outcome.kind()),
        None => format!("{step}: {}", outcome.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;

    struct DenyingEngine;

    #[async_trait]
    impl CaEngine for DenyingEngine {
        async fn sign(&self, _params: &Params) -> Outcome {
            Outcome::denied("no mojo")
        }

        async fn fetch(&self, _params: &Params) -> Outcome {
            Outcome::miss()
        }

        async fn remove(&self, _params: &Params) -> Outcome {
            Outcome::miss()
        }
    }

    #[tokio::test]
    async fn test_passes_against_working_engine() {
        let probe = EngineSelfTest::new(Arc::new(MemoryEngine::new()), "self-test", "...csr...");

        assert_eq!(probe.test().await.unwrap(), TestReport::pass());
    }

    #[tokio::test]
    async fn test_reports_sign_denial() {
        let probe = EngineSelfTest::new(Arc::new(DenyingEngine), "self-test", "...csr...");

        let report = probe.test().await.unwrap();
        assert!(!report.ok);
        assert_eq!(report.message, "sign: denied (no mojo)");
    }

    #[tokio::test]
    async fn test_rejects_empty_fixture() {
        let probe = EngineSelfTest::new(Arc::new(MemoryEngine::new()), "self-test", "");

        let err = probe.test().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid probe fixture: test CSR is empty");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("fetch", &Outcome::miss()), "fetch: miss");
        assert_eq!(
            describe("sign", &Outcome::error("all is lost")),
            "sign: error (all is lost)"
        );
    }
}
