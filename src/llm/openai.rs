use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
};

use super::{GenerateRequest, GenerateResponse, Provider, ProviderError};

/// Chat-completions provider for OpenAI and OpenAI-compatible servers.
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    provider_name: &'static str,
    has_credentials: bool,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.unwrap_or_default());
        Self {
            client: Client::with_config(config),
            provider_name: "openai",
            has_credentials: api_key.is_some(),
        }
    }

    pub fn new_ollama(base_url: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key("ollama")
            .with_api_base(format!("{}/v1", base_url.trim_end_matches('/')));
        Self {
            client: Client::with_config(config),
            provider_name: "ollama",
            has_credentials: true,
        }
    }
}

#[async_trait::async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        if !self.has_credentials {
            return Err(ProviderError::MissingCredentials(self.provider_name));
        }

        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(req.prompt.clone()),
                name: None,
            },
        )];

        #[allow(deprecated)]
        let request = CreateChatCompletionRequest {
            model: req.model.clone(),
            messages,
            temperature: Some(req.temperature),
            max_completion_tokens: Some(req.max_tokens),
            ..Default::default()
        };

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ProviderError::Upstream(format!("{} error: {e}", self.provider_name)))?;

        let first = response.choices.first();

        let content = first
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let finish_reason = first
            .and_then(|c| c.finish_reason)
            .map(|r| format!("{r:?}").to_lowercase())
            .unwrap_or_default();

        let (input_tokens, output_tokens) = match &response.usage {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (0, 0),
        };

        Ok(GenerateResponse {
            content,
            model: response.model,
            input_tokens,
            output_tokens,
            finish_reason,
        })
    }

    fn name(&self) -> &'static str {
        self.provider_name
    }
}
