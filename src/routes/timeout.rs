use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::bfhl::EnvelopeResponse;
use crate::error::AppError;

/// Bounds every request by `config.request_timeout`, answering with a 408 envelope.
pub async fn request_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = state.config.request_timeout;

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Request timed out");
            EnvelopeResponse::failure(&state.config.official_email, &AppError::Timeout)
                .into_response()
        }
    }
}
