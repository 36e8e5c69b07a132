//! listenchart server
//!
//! - `GET /`           : chart front end (static)
//! - `GET /chart-data` : daily "last month listeners" series from Redis

use tracing_subscriber::{fmt, EnvFilter};

use listenchart_core::error::{ListenChartError, Result};
use listenchart_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    // Before the subscriber, so RUST_LOG may come from `.env`.
    let dotenv = dotenv::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), ".env loaded"),
        Err(e) => tracing::info!(error = %e, "no .env file loaded"),
    }

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "listenchart-server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("LISTENCHART_CONFIG")
        .unwrap_or_else(|_| config::DEFAULT_PATH.to_string());
    let cfg = config::load(&path)?;
    let listen = cfg.server.listen_addr()?;
    let start = cfg.chart.start;

    let state = app_state::AppState::connect(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, %start, "listenchart-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ListenChartError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ListenChartError::Internal(format!("server failed: {e}")))
}
