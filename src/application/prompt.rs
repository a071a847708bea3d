//! Prompt assembly for llama3-style instruction models.
//!
//! Each agent owns one [`PromptAssembler`]: an append-only conversation
//! history that renders into a single prompt string wrapped in the model's
//! special tokens. The first message is always a synthesized system message
//! combining the fixed preamble, the tool manifest, and the agent's role.

use crate::application::tooling::ToolManifest;
use crate::domain::types::{Message, SYSTEM_ROLE};

pub const BEGIN_OF_TEXT: &str = "<|begin_of_text|>";
pub const START_HEADER: &str = "<|start_header_id|>";
pub const END_HEADER: &str = "<|end_header_id|>";
pub const EOT: &str = "<|eot_id|>";
pub const EOM: &str = "<|eom_id|>";
pub const PYTHON_TAG: &str = "<|python_tag|>";

pub struct PromptAssembler {
    role: String,
    system_content: String,
    manifest: ToolManifest,
    messages: Vec<Message>,
}

impl PromptAssembler {
    pub fn new(role: &str, system_content: &str, manifest: &ToolManifest) -> Self {
        let mut assembler = Self {
            role: role.to_string(),
            system_content: system_content.to_string(),
            manifest: manifest.clone(),
            messages: Vec::new(),
        };
        assembler.push_system_message();
        assembler
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message, preserving insertion order. Content is trimmed;
    /// there is no deduplication and no size cap. A windowing strategy, if
    /// one is ever needed, belongs at this boundary.
    pub fn add_message(&mut self, role: &str, content: &str) {
        self.messages.push(Message::new(role, content.trim()));
    }

    /// Renders the history into one model-ready prompt string.
    ///
    /// Every message is wrapped in a role header pair and terminated with
    /// [`EOT`], with one exception: a message under the assembler's own role
    /// whose content starts with [`PYTHON_TAG`] keeps its end open, so the
    /// model treats the tool output as continued context rather than
    /// terminated speech.
    pub fn render(&self) -> String {
        let mut prompt = String::from(BEGIN_OF_TEXT);
        for message in &self.messages {
            let role_token = format!("{START_HEADER}{}{END_HEADER}", message.role);
            if message.role == self.role && message.content.starts_with(PYTHON_TAG) {
                prompt.push_str(&format!("{role_token}\n{}", message.content));
            } else {
                prompt.push_str(&format!("{role_token}\n\n{}{EOT}", message.content));
            }
        }
        prompt
    }

    /// Clears the history and re-synthesizes the system message, leaving the
    /// assembler as if freshly constructed.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.push_system_message();
    }

    fn push_system_message(&mut self) {
        let tool_instructions = if self.manifest.is_empty() {
            String::new()
        } else {
            let mut descriptions = String::new();
            for entry in &self.manifest.entries {
                let args = entry
                    .params
                    .iter()
                    .map(|param| format!("{}: {}", param.name, param.type_tag))
                    .collect::<Vec<_>>()
                    .join(", ");
                descriptions.push_str(&format!("\n- {}({}): {}", entry.name, args, entry.description));
            }
            format!(
                "You have access to the following tools, which you can use by outputting a JSON object in the following format:\n\
                 {{\"tool\": \"tool_name\", \"args\": {{\"arg1\": \"value1\", \"arg2\": \"value2\", ...}}}}\n\
                 Replace 'tool_name' with the name of the tool, and provide the necessary arguments. \
                 Write each invocation on a single line and separate multiple invocations with a semicolon.\n\
                 Available tools are:{descriptions}"
            )
        };
        let system_prompt = format!(
            "Environment: ipython\n\
             {tool_instructions}\n\
             Cutting Knowledge Date: December 2023\n\
             Today Date: 23 July 2024\n\n\
             You are the {}.\n\n\
             {}",
            self.role, self.system_content
        );
        self.add_message(SYSTEM_ROLE, &system_prompt);
    }
}
