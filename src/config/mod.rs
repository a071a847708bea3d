use crate::infrastructure::model::SamplingOptions;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config/scrumloop.toml";
pub const CONFIG_PATH: &str = DEFAULT_CONFIG_PATH;

const DEFAULT_MODEL: &str = "llama3.1:8b-instruct-q8_0";
const DEFAULT_ROUNDS: usize = 3;
const DEFAULT_MAX_DELIBERATIONS: usize = 4;
const DEFAULT_SEED_ROLE: &str = "Product Owner";

const DEVELOPER_SYSTEM_MESSAGE: &str =
    "You are a skilled developer in the team. Collaborate effectively with team members \
     and focus on delivering high-quality increments. During meetings you are an effective \
     communicator and provide valuable insights to the team, including the Scrum Master and \
     Product Owner. You thoughtfully evaluate technical proposals from the team and are not \
     afraid to ask questions, seek clarification, or provide constructive criticism when \
     necessary.";

const SCRUM_MASTER_SYSTEM_MESSAGE: &str =
    "You are the Scrum Master for the team. You are responsible for facilitating the Scrum \
     process and ensuring that the team adheres to the Agile principles and practices. You \
     help the team to self-organize and make decisions, and you work to remove any \
     impediments that are hindering the team's progress. You are a servant leader, focused \
     on helping the team to achieve its goals and continuously improve.";

const SPRINT_PLANNING_SEED: &str =
    "This sprint we will be working on creating a remote administration tool. This will be \
     a simple tool that will support 'get', 'put', and 'execute' operations on remote \
     machines. The tool should be able to handle multiple connections and provide a simple \
     command-line interface for users to interact with the remote machines. The remote end \
     will be written in C, and the client will be written in Python.";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub meeting: MeetingConfig,
    pub sampling: SamplingOptions,
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone)]
pub struct MeetingConfig {
    pub rounds: usize,
    pub max_deliberations: usize,
    pub seed_role: String,
    pub seed_message: String,
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub role: String,
    pub model: String,
    pub system_message: String,
    pub is_human: bool,
    pub endpoint: Option<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    meeting: Option<RawMeeting>,
    sampling: Option<RawSampling>,
    #[serde(default)]
    agents: Vec<RawAgent>,
}

#[derive(Debug, Deserialize, Default)]
struct RawMeeting {
    rounds: Option<usize>,
    max_deliberations: Option<usize>,
    seed_role: Option<String>,
    seed_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSampling {
    temperature: Option<f64>,
    top_p: Option<f64>,
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
    role: String,
    model: Option<String>,
    system_message: Option<String>,
    #[serde(default)]
    is_human: bool,
    endpoint: Option<String>,
    #[serde(default)]
    tools: Vec<String>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return read_config(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        match read_config(default_path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!("Configuration file not found; using defaults");
                Ok(Self::default())
            }
            Err(other) => Err(other),
        }
    }

    /// A Developer and a tool-equipped Scrum Master planning the default
    /// sprint, for running without any configuration file.
    pub fn default() -> Self {
        Self {
            meeting: MeetingConfig {
                rounds: DEFAULT_ROUNDS,
                max_deliberations: DEFAULT_MAX_DELIBERATIONS,
                seed_role: DEFAULT_SEED_ROLE.to_string(),
                seed_message: SPRINT_PLANNING_SEED.to_string(),
            },
            sampling: SamplingOptions::default(),
            agents: vec![
                AgentConfig {
                    role: "Developer".to_string(),
                    model: DEFAULT_MODEL.to_string(),
                    system_message: DEVELOPER_SYSTEM_MESSAGE.to_string(),
                    is_human: false,
                    endpoint: None,
                    tools: Vec::new(),
                },
                AgentConfig {
                    role: "Scrum Master".to_string(),
                    model: DEFAULT_MODEL.to_string(),
                    system_message: SCRUM_MASTER_SYSTEM_MESSAGE.to_string(),
                    is_human: false,
                    endpoint: None,
                    tools: vec!["create_user_story".to_string(), "create_subtask".to_string()],
                },
            ],
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let defaults = AppConfig::default();
    let meeting = parsed.meeting.unwrap_or_default();
    let sampling = parsed.sampling.unwrap_or_default();
    let baseline = SamplingOptions::default();

    let agents = if parsed.agents.is_empty() {
        defaults.agents
    } else {
        parsed
            .agents
            .into_iter()
            .map(|agent| AgentConfig {
                role: agent.role,
                model: agent.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                system_message: agent.system_message.unwrap_or_default(),
                is_human: agent.is_human,
                endpoint: agent.endpoint,
                tools: agent.tools,
            })
            .collect()
    };

    Ok(AppConfig {
        meeting: MeetingConfig {
            rounds: meeting.rounds.unwrap_or(DEFAULT_ROUNDS),
            max_deliberations: meeting
                .max_deliberations
                .unwrap_or(DEFAULT_MAX_DELIBERATIONS),
            seed_role: meeting
                .seed_role
                .unwrap_or_else(|| DEFAULT_SEED_ROLE.to_string()),
            seed_message: meeting
                .seed_message
                .unwrap_or_else(|| SPRINT_PLANNING_SEED.to_string()),
        },
        sampling: SamplingOptions {
            temperature: sampling.temperature.unwrap_or(baseline.temperature),
            top_p: sampling.top_p.unwrap_or(baseline.top_p),
            num_predict: sampling.num_predict.unwrap_or(baseline.num_predict),
        },
        agents,
    })
}
