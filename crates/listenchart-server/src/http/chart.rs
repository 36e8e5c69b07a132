use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use listenchart_core::error::{ErrorCode, ListenChartError};
use listenchart_core::range::DateRange;
use listenchart_core::series::ChartPayload;

use crate::app_state::AppState;
use crate::chart::collect_records;

/// `GET /chart-data`: listener series from the configured start through today.
pub async fn chart_data(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let range = DateRange::through_today(state.cfg().chart.start, state.clock());
    let span = tracing::info_span!(
        "chart_data",
        start = %range.start(),
        end = %range.end(),
        days = range.len()
    );

    let result = collect_records(
        state.store(),
        range,
        state.cfg().store.max_in_flight,
        state.metrics(),
    )
    .instrument(span)
    .await;

    let resp = match result {
        Ok(records) => render(&ChartPayload::from_records(&records)),
        Err(e) => error_response(&e),
    };

    let metrics = state.metrics();
    metrics.chart_requests.inc(&[("status", resp.status().as_str())]);
    metrics.chart_duration.observe(&[], started.elapsed());
    resp
}

fn render(payload: &ChartPayload) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode chart payload");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response").into_response()
        }
    }
}

fn error_response(e: &ListenChartError) -> Response {
    let status = match e.code() {
        ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(code = e.code().as_str(), error = %e, "chart data unavailable");
    (status, format!("{}: {}", e.code().as_str(), e)).into_response()
}
