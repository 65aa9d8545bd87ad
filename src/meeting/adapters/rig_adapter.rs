//! Rig adapter serving meeting summary requests with Ollama.

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::ollama;
use tracing::debug;

use crate::meeting::core::config::LlmConfig;
use crate::meeting::core::errors::{SummarizerError, SummarizerResult};
use crate::meeting::provider::completion::{ChunkStream, CompletionProvider};
use crate::meeting::provider::request::ProviderRequest;

/// Initialize tracing with a basic subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Completion provider backed by a Rig Ollama client.
///
/// The model defaults to [`LlmConfig::model`]. A user-configured provider may
/// override it with a `model` variable; hosted requests always use the
/// configured default.
pub struct RigOllamaProvider {
    client: ollama::Client<ReqwestClient>,
    config: LlmConfig,
}

impl RigOllamaProvider {
    /// Create a new provider from the completion model config.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the Ollama client
    /// cannot be built.
    pub fn new(config: &LlmConfig) -> SummarizerResult<Self> {
        config.validate()?;
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(rig::client::Nothing);
        let builder = if let Some(base_url) = &config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build().map_err(SummarizerError::from)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn model_name(&self, request: &ProviderRequest) -> String {
        if request.uses_hosted_api() {
            return self.config.model.clone();
        }
        request
            .selected_provider
            .variable("model")
            .map_or_else(|| self.config.model.clone(), ToString::to_string)
    }

    async fn complete(&self, request: ProviderRequest) -> SummarizerResult<String> {
        let model_name = self.model_name(&request);
        let model = self.client.completion_model(model_name.clone());
        debug!(
            model = %model_name,
            hosted = request.uses_hosted_api(),
            prompt_chars = request.user_message.chars().count(),
            "Sending completion request"
        );

        let completion = model
            .completion_request(request.user_message)
            .preamble(request.system_prompt)
            .temperature(self.config.temperature)
            .max_tokens_opt(self.config.max_tokens)
            .build();

        let response = model.completion(completion).await?;
        Ok(extract_text(&response.choice))
    }
}

impl CompletionProvider for RigOllamaProvider {
    fn stream_completion(&self, request: ProviderRequest) -> ChunkStream<'_> {
        Box::pin(futures::stream::once(self.complete(request)))
    }
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
