//! OpenAI-compatible inference engine
//!
//! Talks to any chat-completion endpoint that honors JSON-schema response
//! formats (OpenAI, vLLM, Ollama). One request per prompt; the batch is
//! dispatched concurrently and results come back in prompt order.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
        ResponseFormat as ApiResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::time::Duration;
use tracing::{debug, instrument};

use risk_atlas_common::{AtlasError, InferenceConfig, Result};

use crate::inference::{InferenceEngine, InferenceOutput, ResponseFormat};

pub struct OpenAiEngine {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl OpenAiEngine {
    #[instrument(skip_all, fields(base_url = %config.base_url, model = %config.model))]
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let mut api_config = OpenAIConfig::new().with_api_base(&config.base_url);
        if let Some(var) = &config.api_key_env {
            let key = std::env::var(var).map_err(|_| {
                AtlasError::Config(format!("API key environment variable {var} is not set"))
            })?;
            api_config = api_config.with_api_key(key);
        }

        Ok(Self {
            client: Client::with_config(api_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn complete(&self, prompt: String, format: &ResponseFormat) -> Result<InferenceOutput> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(vec![ChatCompletionRequestUserMessage::from(prompt).into()])
            .temperature(self.temperature)
            .response_format(ApiResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: format.postprocessor().to_string(),
                    description: None,
                    schema: Some(format.schema()),
                    strict: Some(true),
                },
            });
        if let Some(max_tokens) = self.max_tokens {
            args.max_tokens(max_tokens);
        }
        let request = args
            .build()
            .map_err(|e| AtlasError::Inference(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                AtlasError::Inference(format!(
                    "inference request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| AtlasError::Inference(e.to_string()))?;

        let raw = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AtlasError::MalformedResponse("completion carried no message content".to_string())
            })?;

        let prediction = format.parse(&raw)?;
        Ok(InferenceOutput { prediction, raw })
    }
}

#[async_trait]
impl InferenceEngine for OpenAiEngine {
    #[instrument(skip_all, fields(prompts = prompts.len(), model = %self.model, format = format.postprocessor()))]
    async fn generate(
        &self,
        prompts: Vec<String>,
        format: &ResponseFormat,
    ) -> Result<Vec<InferenceOutput>> {
        debug!("Dispatching {} prompts", prompts.len());
        try_join_all(prompts.into_iter().map(|p| self.complete(p, format))).await
    }
}
