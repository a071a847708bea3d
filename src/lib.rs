pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::agent::{Agent, AgentError, AgentSpec};
pub use application::meeting::{Meeting, MeetingSummary, SeedMessage};
pub use application::prompt::PromptAssembler;
pub use application::tooling::{ToolCall, ToolDescriptor, ToolRegistry, parse_tool_calls};
pub use infrastructure::model::{ModelProvider, OllamaClient};
