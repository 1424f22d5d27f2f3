pub mod answer;
pub mod client;
pub mod gemini;
pub mod openai;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use answer::{AnswerToken, extract_answer_token};
pub use client::{LlmClient, RetryPolicy};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingCredentials(&'static str),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("{provider} API error ({status}): {message}")]
    Status {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Upstream(String),
}

impl ProviderError {
    /// Value for the `error.type` span attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::MissingCredentials(_) => "missing_credentials",
            ProviderError::Timeout => "timeout",
            ProviderError::Network(_) => "network_error",
            ProviderError::Decode(_) => "decode_error",
            ProviderError::Status { status, .. } => match status {
                429 => "rate_limit",
                401 | 403 => "auth_error",
                400 | 404 | 422 => "invalid_request",
                500..=599 => "server_error",
                _ => "unknown_error",
            },
            ProviderError::Upstream(msg) => classify_message(msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.kind(),
            "missing_credentials" | "auth_error" | "invalid_request"
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

// Errors surfaced by client libraries only as text.
fn classify_message(msg: &str) -> &'static str {
    let msg = msg.to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else {
        "unknown_error"
    }
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
    fn name(&self) -> &'static str;
}
