use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// Uniform wrapper returned by every endpoint. `data` is set iff
/// `is_success`, `error` iff not.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(official_email: &str, data: T) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Success without a payload, used by `/health`.
    pub fn ok(official_email: &str) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: None,
            error: None,
        }
    }

    pub fn failure(official_email: &str, error: &AppError) -> Self {
        Self {
            is_success: false,
            official_email: official_email.to_string(),
            data: None,
            error: Some(error.client_message()),
        }
    }
}

/// Pairs an envelope with the status it is sent under.
pub struct EnvelopeResponse<T: Serialize>(pub StatusCode, pub Envelope<T>);

impl<T: Serialize> IntoResponse for EnvelopeResponse<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl<T: Serialize> EnvelopeResponse<T> {
    pub fn success(official_email: &str, data: T) -> Self {
        Self(StatusCode::OK, Envelope::success(official_email, data))
    }
}

impl EnvelopeResponse<()> {
    pub fn ok(official_email: &str) -> Self {
        Self(StatusCode::OK, Envelope::ok(official_email))
    }

    pub fn failure(official_email: &str, error: &AppError) -> Self {
        Self(error.status(), Envelope::failure(official_email, error))
    }
}
