use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bfhl_service::llm::{
    GenerateRequest, GenerateResponse, LlmClient, Provider, ProviderError, RetryPolicy,
};
use bfhl_service::{AppState, Config, routes};
use serde_json::Value;
use tower::util::ServiceExt;

pub const EMAIL: &str = "tester@example.edu";

/// Provider that replies with a fixed completion, or fails when `None`.
pub struct CannedProvider(pub Option<&'static str>);

#[async_trait::async_trait]
impl Provider for CannedProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        match self.0 {
            Some(text) => Ok(GenerateResponse {
                content: text.to_string(),
                model: req.model.clone(),
                ..GenerateResponse::default()
            }),
            None => Err(ProviderError::Network("connection refused".into())),
        }
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

/// Provider that answers only after a delay.
pub struct SlowProvider(pub Duration);

#[async_trait::async_trait]
impl Provider for SlowProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(GenerateResponse {
            content: "Late".to_string(),
            model: req.model.clone(),
            ..GenerateResponse::default()
        })
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

pub fn test_config() -> Config {
    Config {
        official_email: EMAIL.to_string(),
        ..Config::default()
    }
}

pub fn app_with(provider: impl Provider + 'static) -> Router {
    app_with_config(test_config(), provider)
}

pub fn app_with_config(config: Config, provider: impl Provider + 'static) -> Router {
    let llm_client = LlmClient::new(Arc::new(provider), "canned-model").with_policy(RetryPolicy {
        timeout: Duration::from_secs(2),
        max_retries: 0,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    });

    routes::create_router(AppState {
        config,
        llm_client: Arc::new(llm_client),
    })
}

pub fn app() -> Router {
    app_with(CannedProvider(Some("Paris is the capital of France.")))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

pub async fn post_raw(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/bfhl")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string()).await
}
