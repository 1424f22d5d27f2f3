use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::AppState;
use crate::bfhl::{BfhlRequest, EnvelopeResponse, dispatch};
use crate::error::{AppError, AppResult};

pub async fn bfhl(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let email = &state.config.official_email;

    match handle(&state, payload).await {
        Ok(data) => EnvelopeResponse::success(email, data).into_response(),
        Err(err) => EnvelopeResponse::failure(email, &err).into_response(),
    }
}

async fn handle(state: &AppState, payload: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    let Json(body) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let request = BfhlRequest::from_value(&body)?;
    let output = dispatch(request, &state.llm_client).await?;

    serde_json::to_value(output).map_err(|e| AppError::Internal(e.to_string()))
}
