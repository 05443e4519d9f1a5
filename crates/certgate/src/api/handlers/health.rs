//! Self-test health handler
//!
//! Reporting is this endpoint's whole job, so it is the one place where a
//! failing or panicking probe is absorbed and turned into a response.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use certgate_core::SelfTest;

use crate::api::reply::Reply;

/// Run the self-test probe
///
/// GET /test
///
/// `200 OK` when the probe passes, otherwise `503` with the failure message
/// as the body.
pub async fn run_self_test(State(probe): State<Arc<dyn SelfTest>>) -> Reply {
    // A panic inside the probe surfaces as a JoinError on its own task
    let task = tokio::spawn(async move { probe.test().await });

    match task.await {
        Ok(Ok(report)) if report.ok => {
            info!("Self-test passed");
            Reply::ok()
        }
        Ok(Ok(report)) => {
            warn!(message = %report.message, "Self-test failed");
            Reply::service_unavailable(report.message)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "Self-test could not run");
            Reply::service_unavailable(err.to_string())
        }
        Err(join_err) => {
            let message = join_failure_message(join_err);
            error!(message = %message, "Self-test aborted");
            Reply::service_unavailable(message)
        }
    }
}

/// Uniform `405` for non-GET requests to the health path
pub async fn method_not_allowed() -> Reply {
    Reply::method_not_allowed()
}

fn join_failure_message(err: JoinError) -> String {
    if err.is_cancelled() {
        return "self-test was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(err) => err.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "self-test panicked".to_string()
    }
}
