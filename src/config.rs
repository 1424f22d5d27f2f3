use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;

use crate::llm::gemini;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub official_email: String,
    pub ai_provider: String,
    pub ai_model: String,
    pub ai_fallback_provider: Option<String>,
    pub ai_fallback_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub ollama_base_url: String,
    pub ai_timeout: Duration,
    pub ai_max_retries: u32,
    pub ai_max_tokens: u32,
    pub ai_temperature: f32,
    pub request_timeout: Duration,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            official_email: "test@chitkara.edu.in".to_string(),
            ai_provider: "gemini".to_string(),
            ai_model: "gemini-2.0-flash".to_string(),
            ai_fallback_provider: None,
            ai_fallback_model: "gpt-4.1-mini".to_string(),
            gemini_api_key: None,
            gemini_base_url: gemini::DEFAULT_BASE_URL.to_string(),
            openai_api_key: None,
            ollama_base_url: "http://localhost:11434".to_string(),
            ai_timeout: Duration::from_secs(10),
            ai_max_retries: 0,
            ai_max_tokens: 64,
            ai_temperature: 0.2,
            request_timeout: Duration::from_secs(30),
            otel_service_name: "bfhl-service".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            official_email: env::var("OFFICIAL_EMAIL").unwrap_or(defaults.official_email),
            ai_provider: env::var("AI_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.ai_provider),
            ai_model: env::var("AI_MODEL").unwrap_or(defaults.ai_model),
            ai_fallback_provider: non_empty_var("AI_FALLBACK_PROVIDER").map(|p| p.to_lowercase()),
            ai_fallback_model: env::var("AI_FALLBACK_MODEL").unwrap_or(defaults.ai_fallback_model),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            ollama_base_url: env::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            ai_timeout: Duration::from_secs(parse_var(
                "AI_TIMEOUT_SECS",
                defaults.ai_timeout.as_secs(),
            )?),
            ai_max_retries: parse_var("AI_MAX_RETRIES", defaults.ai_max_retries)?,
            ai_max_tokens: parse_var("AI_MAX_TOKENS", defaults.ai_max_tokens)?,
            ai_temperature: parse_var("AI_TEMPERATURE", defaults.ai_temperature)?,
            request_timeout: Duration::from_secs(parse_var(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or(defaults.otel_service_name),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or(defaults.otel_exporter_endpoint),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{name} must be a valid number, got {raw:?}: {e}"))
}
