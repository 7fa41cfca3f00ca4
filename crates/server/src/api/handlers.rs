use crate::config::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// One JSON-RPC message per POST. Notifications get `202 Accepted` with no
/// body; everything else, including protocol errors, is answered with 200.
pub async fn handle_mcp(State(state): State<AppState>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
