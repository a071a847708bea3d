//! Model clients

mod base;
mod ollama;

pub use base::HttpClientBase;
pub use ollama::OllamaClient;
