//! API module for the certgate server

pub mod error;
pub mod form;
pub mod handlers;
pub mod reply;
pub mod route;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use certgate_core::{CaEngine, SelfTest};

use handlers::AppState;

/// Path the health router answers on
pub const HEALTH_PATH: &str = "/test";

/// Create the certificate gateway router
///
/// Every request goes through [`handlers::dispatch`]; the router itself
/// registers no routes so that method and path handling follow the
/// dispatch table exactly.
pub fn create_router(engine: Arc<dyn CaEngine>) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .fallback(handlers::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the self-test health router, mounted separately from the gateway
pub fn create_health_router(probe: Arc<dyn SelfTest>) -> Router {
    Router::new()
        .route(
            HEALTH_PATH,
            get(handlers::run_self_test).fallback(handlers::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(probe)
}
