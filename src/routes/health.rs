use axum::extract::State;

use crate::AppState;
use crate::bfhl::EnvelopeResponse;

pub async fn health(State(state): State<AppState>) -> EnvelopeResponse<()> {
    EnvelopeResponse::ok(&state.config.official_email)
}
