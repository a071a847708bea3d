//! Model gateway trait

use super::types::{GenerateRequest, GenerateResponse, ModelError};
use async_trait::async_trait;

/// Trait for text-completion providers: one request in, one full response
/// out. Batch completion is the contract; there is no streaming variant.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, request: GenerateRequest) -> Result<GenerateResponse, ModelError>;
}
