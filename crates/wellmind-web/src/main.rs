//! WellMind Web Server
//!
//! Run with: cargo run -p wellmind-web
//!
//! Reads wellmind.toml (or $WELLMIND_CONFIG) and a .env file if present.
//! Set AI_BACKEND_URL to score through an external AI backend.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wellmind_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting WellMind Web Server...");

    let config = AppConfig::load()?;
    let addr = config.bind_addr()?;
    let flush_timeout = config.http_timeout() * 2;
    info!("Notifications go to {} ({:?} mode)", config.notify_base_url(), config.notify.mode);

    // Create app state
    let state = wellmind_web::state::AppState::from_config(config)?;
    info!("Scoring backend: {}", state.predictions.scorer().backend());
    let notify_worker = state.predictions.notifier().take_worker();

    // Build router
    let app = wellmind_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    // The router and its notifier are gone, so the worker exits once the queue is empty.
    if let Some(worker) = notify_worker {
        info!("Delivering queued notifications");
        if tokio::time::timeout(flush_timeout, worker).await.is_err() {
            warn!("Queued notifications not delivered within {:?}, dropping them", flush_timeout);
        }
    }

    Ok(())
}
