use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::app_state::AppState;

/// `GET /`: the chart front end, read from `server.static_dir` on each request.
pub async fn index(State(state): State<AppState>) -> Response {
    let path = Path::new(&state.cfg().server.static_dir).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "index not readable");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}
