use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{GenerateRequest, GenerateResponse, LlmClient, Provider, ProviderError, RetryPolicy};

pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(1),
        max_retries,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

pub fn client_with(provider: impl Provider + 'static) -> LlmClient {
    LlmClient::new(Arc::new(provider), "test-model").with_policy(fast_policy(0))
}

fn response(content: &str, model: &str) -> GenerateResponse {
    GenerateResponse {
        content: content.to_string(),
        model: model.to_string(),
        input_tokens: 4,
        output_tokens: 2,
        finish_reason: "stop".to_string(),
    }
}

/// Always answers the same way.
pub struct StaticProvider {
    text: Option<String>,
    error: Option<fn() -> ProviderError>,
    delay: Duration,
}

impl StaticProvider {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            error: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            text: None,
            error: Some(error),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl Provider for StaticProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match (&self.text, self.error) {
            (_, Some(error)) => Err(error()),
            (Some(text), None) => Ok(response(text, &req.model)),
            (None, None) => Ok(response("", &req.model)),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Plays back a fixed sequence of outcomes, one per call.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: AtomicUsize,
    last_model: Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            last_model: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_model(&self) -> Option<String> {
        self.last_model.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_model.lock().unwrap() = Some(req.model.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(response(&text, &req.model)),
            Some(Err(err)) => Err(err),
            None => Err(ProviderError::Upstream("script exhausted".into())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
