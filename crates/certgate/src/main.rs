//! Certgate Server Binary
//!
//! Runs the certgate HTTP gateway in front of the in-memory development CA.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use certgate::{create_health_router, create_router, EngineSelfTest, GatewayConfig, MemoryEngine};
use certgate_core::{CaEngine, SelfTest};

#[tokio::main]
async fn main() {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("certgate: {err}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let engine: Arc<dyn CaEngine> = Arc::new(MemoryEngine::new());
    warn!("Using in-memory development CA; certificates are not signed");

    let mut app = create_router(Arc::clone(&engine));

    if let Some(self_test) = &config.self_test {
        let csr = match self_test.load_csr() {
            Ok(csr) => csr,
            Err(err) => {
                eprintln!("certgate: {err}");
                std::process::exit(1);
            }
        };
        let probe: Arc<dyn SelfTest> =
            Arc::new(EngineSelfTest::new(Arc::clone(&engine), self_test.cn.clone(), csr));
        app = app.merge(create_health_router(probe));
        info!(cn = %self_test.cn, "Self-test endpoint enabled");
    }

    info!(
        addr = %config.bind_addr,
        log_level = %config.log_level,
        "Starting certgate server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %config.bind_addr, "Certgate listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
