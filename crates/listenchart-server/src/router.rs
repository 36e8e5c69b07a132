//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{app_state::AppState, http};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::index::index))
        .route("/chart-data", get(http::chart::chart_data))
        .route("/healthz", get(http::ops::healthz))
        .route("/metrics", get(http::ops::metrics))
        .with_state(state)
}
