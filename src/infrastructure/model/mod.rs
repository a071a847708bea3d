//! Model gateway module
//!
//! - `types` - request, response, error types
//! - `traits` - the `ModelProvider` seam
//! - `clients` - HTTP client implementations

pub mod clients;
pub mod traits;
pub mod types;

pub use clients::OllamaClient;
pub use traits::ModelProvider;
pub use types::{GenerateRequest, GenerateResponse, ModelError, SamplingOptions};
