use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::gemini::GeminiProvider;
use super::openai::OpenAIProvider;
use super::{
    AnswerToken, GenerateRequest, GenerateResponse, Provider, ProviderError,
    extract_answer_token,
};
use crate::config::Config;
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_FALLBACK_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_RETRY_COUNT,
    GEN_AI_TOKEN_USAGE,
};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Bound on a single upstream attempt.
    pub timeout: Duration,
    /// Attempts after the first one; zero disables retrying.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 0,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);
        // 25% jitter to avoid thundering herd
        let jitter_ms = fastrand::u64(0..=base.as_millis() as u64 / 4);
        base + Duration::from_millis(jitter_ms)
    }
}

pub struct LlmClient {
    pub primary: Arc<dyn Provider>,
    pub fallback: Option<Arc<dyn Provider>>,
    pub model: String,
    pub fallback_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub policy: RetryPolicy,
}

fn build_provider(name: &str, config: &Config) -> anyhow::Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match name {
        "gemini" => Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
        )),
        "openai" => Arc::new(OpenAIProvider::new(config.openai_api_key.as_deref())),
        "ollama" => Arc::new(OpenAIProvider::new_ollama(&config.ollama_base_url)),
        other => anyhow::bail!("unsupported AI provider {other:?} (expected gemini, openai or ollama)"),
    };
    Ok(provider)
}

impl LlmClient {
    pub fn new(primary: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            primary,
            fallback: None,
            model: model.into(),
            fallback_model: String::new(),
            temperature: 0.2,
            max_tokens: 64,
            policy: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let primary = build_provider(&config.ai_provider, config)?;
        let fallback = config
            .ai_fallback_provider
            .as_deref()
            .map(|name| build_provider(name, config))
            .transpose()?;

        Ok(Self {
            primary,
            fallback,
            model: config.ai_model.clone(),
            fallback_model: config.ai_fallback_model.clone(),
            temperature: config.ai_temperature,
            max_tokens: config.ai_max_tokens,
            policy: RetryPolicy {
                timeout: config.ai_timeout,
                max_retries: config.ai_max_retries,
                ..RetryPolicy::default()
            },
        })
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        self.fallback = Some(fallback);
        self.fallback_model = model.into();
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn generate_once(
        &self,
        provider: &dyn Provider,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let provider_name = provider.name();
        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        span.add_event(
            "gen_ai.user.message",
            vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))],
        );

        let result = tokio::time::timeout(self.policy.timeout, provider.generate(req))
            .instrument(span.clone())
            .await
            .unwrap_or(Err(ProviderError::Timeout));

        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(resp) => {
                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.output_tokens as i64);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
                let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name);
                let model_kv = KeyValue::new("gen_ai.request.model", req.model.clone());

                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(resp)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", err.kind());

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[
                        KeyValue::new("gen_ai.provider.name", provider_name),
                        KeyValue::new("gen_ai.request.model", req.model.clone()),
                        KeyValue::new("error.type", err.kind()),
                    ],
                );

                Err(err)
            }
        }
    }

    pub async fn generate_with_retry(
        &self,
        provider: &dyn Provider,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let attempts = self.policy.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            let err = match self.generate_once(provider, req).await {
                Ok(resp) => return Ok(resp),
                Err(err) => err,
            };

            attempt += 1;
            if attempt >= attempts || !err.is_retryable() {
                return Err(err);
            }

            tracing::warn!(
                attempt,
                max_attempts = attempts,
                provider = provider.name(),
                model = %req.model,
                error = %err,
                "LLM call failed, retrying"
            );

            GEN_AI_RETRY_COUNT.add(
                1,
                &[
                    KeyValue::new("gen_ai.provider.name", provider.name()),
                    KeyValue::new("gen_ai.request.model", req.model.clone()),
                ],
            );

            tokio::time::sleep(self.policy.backoff(attempt - 1)).await;
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse, ProviderError> {
        let req = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let primary_err = match self.generate_with_retry(self.primary.as_ref(), &req).await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            return Err(primary_err);
        };

        tracing::warn!(
            primary_provider = self.primary.name(),
            fallback_provider = fallback.name(),
            error = %primary_err,
            "Primary provider failed, falling back"
        );

        GEN_AI_FALLBACK_COUNT.add(
            1,
            &[KeyValue::new("gen_ai.provider.name", fallback.name())],
        );

        let fallback_req = GenerateRequest {
            model: self.fallback_model.clone(),
            ..req
        };

        self.generate_with_retry(fallback.as_ref(), &fallback_req)
            .await
    }

    /// Asks `question` and reduces the completion to a single answer token.
    /// Upstream failures become [`AnswerToken::Error`] instead of an error.
    #[tracing::instrument(name = "ai.answer", skip(self, question), fields(ai.answer.kind))]
    pub async fn answer(&self, question: &str) -> AnswerToken {
        let token = match self.generate(question).await {
            Ok(resp) => extract_answer_token(&resp.content),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    error.type = err.kind(),
                    "AI upstream failed, answering with sentinel"
                );
                AnswerToken::Error
            }
        };

        let kind = match &token {
            AnswerToken::Word(_) => "word",
            AnswerToken::Unknown => "unknown",
            AnswerToken::Error => "error",
        };
        tracing::Span::current().record("ai.answer.kind", kind);

        token
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}
