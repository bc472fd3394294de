pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod members;
pub mod models;
pub mod router;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod views;

use config::Config;
use error::AppError;
use state::AppState;
use store::GroupStore;

/// Group Editor entry point.
///
/// Everything except the process exit code lives here so it can be tested
/// and referenced by the thin `main.rs` binary wrapper.
pub async fn run() -> Result<(), AppError> {
    // ── Configuration ────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Tracing setup (before anything that logs) ────────────────────────────
    let _tracing_guard = telemetry::init(&config.log_dir())?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        bind = %config.bind,
        "Group Editor starting"
    );

    // ── Application state ────────────────────────────────────────────────────
    let store = GroupStore::open(&config.data_dir)?;
    let app = router::build(AppState::new(store));

    // ── Serve ────────────────────────────────────────────────────────────────
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Io(format!("cannot bind {addr}: {e}")))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Io(format!("server error: {e}")))?;

    tracing::info!("Group Editor stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
