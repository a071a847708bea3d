use crate::infrastructure::model::ModelError;
use thiserror::Error;

/// Hard failures of an agent's turn. Tool problems never surface here; they
/// become acknowledgment text inside the conversation. Only a gateway
/// failure aborts the step, since no text exists to reason about.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
}
