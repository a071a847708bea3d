//! Ollama client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{
    GenerateRequest, GenerateResponse, ModelError, SamplingOptions,
};

/// Ollama client for local LLM completion via `/api/generate`.
#[derive(Clone)]
pub struct OllamaClient {
    base: HttpClientBase,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            base: HttpClientBase::new("ollama".to_string(), endpoint.into()),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaClient {
    async fn complete(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let url = self.base.build_url("/api/generate");

        let payload = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            options: &request.options,
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            prompt_len = request.prompt.len(),
            "Sending generate request to Ollama"
        );

        let response: OllamaGenerateResponse = self.base.post_json(&url, &payload).await?;
        debug!("Received response from Ollama");

        let text = response
            .response
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing response field"))?;

        Ok(GenerateResponse {
            text: text.trim().to_string(),
        })
    }
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: &'a SamplingOptions,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_payload_matches_generate_contract() {
        let payload = OllamaGenerateRequest {
            model: "llama3.1:8b-instruct-q8_0",
            prompt: "<|begin_of_text|>",
            options: &SamplingOptions::default(),
            stream: false,
        };
        let encoded = serde_json::to_value(&payload).expect("serializable");
        assert_eq!(encoded["model"], "llama3.1:8b-instruct-q8_0");
        assert_eq!(encoded["stream"], false);
        assert_eq!(encoded["options"]["top_p"], 0.9);
        assert_eq!(encoded["options"]["num_predict"], 1500);
    }
}
