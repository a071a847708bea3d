use super::errors::AgentError;
use crate::application::prompt::PromptAssembler;
use crate::application::tooling::{ToolRegistry, parse_tool_calls};
use crate::domain::types::{Message, thoughts_role};
use crate::infrastructure::model::{GenerateRequest, ModelProvider, SamplingOptions};
use crate::infrastructure::transcript::TranscriptLog;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identity of one meeting participant, as configured.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub role: String,
    pub model: String,
    pub system_message: String,
    pub is_human: bool,
}

/// One simulated team member: an identity, an owned conversation history,
/// an owned tool registry, and a handle to the model gateway.
///
/// A turn moves through deciding, then either responding or yielding:
/// [`Agent::take_turn`] elicits a floor decision up to `max_deliberations`
/// times, records declined-floor reasoning as private thoughts, and speaks
/// at most once.
pub struct Agent {
    role: String,
    model: String,
    is_human: bool,
    sampling: SamplingOptions,
    max_deliberations: usize,
    assembler: PromptAssembler,
    registry: ToolRegistry,
    provider: Arc<dyn ModelProvider>,
    transcript: TranscriptLog,
}

impl Agent {
    pub fn new(
        spec: AgentSpec,
        registry: ToolRegistry,
        provider: Arc<dyn ModelProvider>,
        sampling: SamplingOptions,
        max_deliberations: usize,
        log_dir: impl AsRef<Path>,
    ) -> Self {
        let manifest = registry.describe();
        let assembler = PromptAssembler::new(&spec.role, &spec.system_message, &manifest);
        let transcript = TranscriptLog::new(log_dir, &spec.role);
        Self {
            role: spec.role,
            model: spec.model,
            is_human: spec.is_human,
            sampling,
            max_deliberations,
            assembler,
            registry,
            provider,
            transcript,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_human(&self) -> bool {
        self.is_human
    }

    pub fn history(&self) -> &[Message] {
        self.assembler.messages()
    }

    /// Appends a message to the owned history and mirrors it into the
    /// transcript artifact. The history append always happens; the
    /// transcript write is best-effort telemetry.
    pub fn observe_message(&mut self, from_role: &str, content: &str) {
        let content = content.trim();
        self.assembler.add_message(from_role, content);
        if let Err(err) = self.transcript.append(from_role, content) {
            warn!(role = self.role.as_str(), %err, "Failed to append transcript record");
        }
    }

    /// Asks the model whether this agent should take the floor right now.
    ///
    /// The trailing decision token is matched case-insensitively; anything
    /// without an explicit yes reads as no, so an ambiguous model stays
    /// silent rather than acting. Declined-floor reasoning is recorded under
    /// the agent's thoughts pseudo-role and is never broadcast.
    pub async fn decide_retain_floor(&mut self) -> Result<(bool, String), AgentError> {
        let mut prompt = self.assembler.render();
        prompt.push_str(&decision_instruction(&self.role));
        debug!(role = self.role.as_str(), "Eliciting floor decision");

        let response = self
            .provider
            .complete(GenerateRequest {
                model: self.model.clone(),
                prompt,
                options: self.sampling.clone(),
            })
            .await?;

        let reasoning = response.text;
        let retain = parse_decision(&reasoning);
        info!(role = self.role.as_str(), retain, "Floor decision");

        if !retain {
            let pseudo_role = thoughts_role(&self.role);
            self.observe_message(&pseudo_role, &reasoning);
        }

        Ok((retain, reasoning))
    }

    /// Runs one full turn: deliberate until the agent claims the floor, then
    /// speak once. Returns the spoken response for broadcast, or `None` if
    /// the agent yielded the floor after every deliberation declined it.
    pub async fn take_turn(&mut self) -> Result<Option<String>, AgentError> {
        for _ in 0..self.max_deliberations {
            let (retain, _reasoning) = self.decide_retain_floor().await?;
            if retain {
                return Ok(Some(self.generate_response().await?));
            }
        }
        info!(
            role = self.role.as_str(),
            deliberations = self.max_deliberations,
            "Yielded the floor"
        );
        Ok(None)
    }

    /// Generates the agent's contribution for this turn. Tool calls embedded
    /// in the model output are executed in order and their acknowledgments
    /// become the effective response; otherwise the raw text stands.
    pub async fn generate_response(&mut self) -> Result<String, AgentError> {
        let prompt = self.assembler.render();
        let response = self
            .provider
            .complete(GenerateRequest {
                model: self.model.clone(),
                prompt,
                options: self.sampling.clone(),
            })
            .await?;

        let calls = parse_tool_calls(&response.text);
        let effective = if calls.is_empty() {
            response.text
        } else {
            info!(role = self.role.as_str(), calls = calls.len(), "Executing tool calls");
            calls
                .iter()
                .map(|call| self.registry.invoke(&call.tool, &call.args))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let own_role = self.role.clone();
        self.observe_message(&own_role, &effective);
        Ok(effective)
    }
}

fn decision_instruction(role: &str) -> String {
    format!(
        "Considering the above conversation, should I, as the {role}, take the floor \
         at this point (respond, invoke a tool, or both)? Provide a short summary of \
         your reasoning and conclude with 'Decision: Yes' or 'Decision: No'."
    )
}

pub(crate) fn parse_decision(text: &str) -> bool {
    text.to_lowercase().contains("decision: yes")
}
