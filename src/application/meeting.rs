//! Turn coordination for one meeting.
//!
//! A [`Meeting`] owns the participating agents and drives them strictly
//! sequentially: one agent computes at a time, and a spoken response is
//! broadcast to the other agents in fixed enumeration order, strictly after
//! the speaker finalized it. That ordering fixes who heard what when, which
//! keeps scripted replays deterministic.

use crate::application::agent::Agent;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The opening context delivered identically to every agent before round 1.
#[derive(Debug, Clone)]
pub struct SeedMessage {
    pub role: String,
    pub content: String,
}

/// One spoken contribution, in meeting order.
#[derive(Debug, Clone, Serialize)]
pub struct SpokenEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingSummary {
    pub meeting_id: String,
    pub rounds_completed: usize,
    pub entries: Vec<SpokenEntry>,
}

pub struct Meeting {
    id: String,
    agents: Vec<Agent>,
    rounds: usize,
    seed: SeedMessage,
}

impl Meeting {
    pub fn new(agents: Vec<Agent>, rounds: usize, seed: SeedMessage) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            agents,
            rounds,
            seed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Runs the meeting to its round bound and returns what was said.
    ///
    /// Human participants are skipped by the automatic loop. An agent whose
    /// gateway call fails loses only its own turn; the meeting carries on
    /// with the next agent.
    pub async fn run(&mut self) -> MeetingSummary {
        info!(
            meeting_id = self.id.as_str(),
            rounds = self.rounds,
            agents = self.agents.len(),
            "Meeting started"
        );

        for agent in &mut self.agents {
            agent.observe_message(&self.seed.role, &self.seed.content);
        }

        let mut entries = Vec::new();
        for round in 1..=self.rounds {
            info!(meeting_id = self.id.as_str(), round, "Round started");
            for speaker in 0..self.agents.len() {
                if self.agents[speaker].is_human() {
                    debug!(
                        role = self.agents[speaker].role(),
                        "Skipping human participant"
                    );
                    continue;
                }
                let role = self.agents[speaker].role().to_string();
                match self.agents[speaker].take_turn().await {
                    Ok(Some(response)) => {
                        for (peer, agent) in self.agents.iter_mut().enumerate() {
                            if peer != speaker {
                                agent.observe_message(&role, &response);
                            }
                        }
                        entries.push(SpokenEntry {
                            role,
                            content: response,
                        });
                    }
                    Ok(None) => {
                        debug!(role = role.as_str(), round, "Agent yielded the floor");
                    }
                    Err(err) => {
                        warn!(
                            role = role.as_str(),
                            round,
                            %err,
                            "Agent turn failed; continuing with next agent"
                        );
                    }
                }
            }
        }

        info!(
            meeting_id = self.id.as_str(),
            spoken = entries.len(),
            "Meeting finished"
        );
        MeetingSummary {
            meeting_id: self.id.clone(),
            rounds_completed: self.rounds,
            entries,
        }
    }
}
