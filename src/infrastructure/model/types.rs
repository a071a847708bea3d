//! Model gateway types - request, response, and error types

use serde::Serialize;
use thiserror::Error;

/// Sampling options forwarded to the model verbatim. Defaults are the
/// project-wide baseline; config may override them, call sites never do.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingOptions {
    pub temperature: f64,
    pub top_p: f64,
    pub num_predict: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            num_predict: 1500,
        }
    }
}

/// One synchronous text-completion request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub options: SamplingOptions,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
}

/// Gateway errors. Network covers transport failures and non-success
/// statuses alike; no generated text exists in either case, so callers
/// treat both as a hard failure of the current step.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}
