use serde::{Deserialize, Serialize};

/// Role name of the synthesized first message in every conversation history.
pub const SYSTEM_ROLE: &str = "system";

/// Suffix appended to an agent's role to form the pseudo-role its private
/// deliberation is recorded under. Messages with this role are never
/// broadcast to peers.
pub const THOUGHTS_SUFFIX: &str = "_thoughts";

pub fn thoughts_role(role: &str) -> String {
    format!("{role}{THOUGHTS_SUFFIX}")
}

/// One entry in an agent's conversation history.
///
/// Roles are open-ended strings rather than a closed enum: besides agent
/// identities like "Developer" they include [`SYSTEM_ROLE`] and per-agent
/// pseudo-roles such as "Developer_thoughts".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
