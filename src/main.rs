use clap::Parser;
use scrumloop::application::agent::{Agent, AgentSpec};
use scrumloop::application::meeting::{Meeting, SeedMessage};
use scrumloop::application::tooling::{ToolRegistry, builtin};
use scrumloop::cli::Cli;
use scrumloop::config::AppConfig;
use scrumloop::infrastructure::backlog::BacklogStore;
use scrumloop::infrastructure::model::{ModelProvider, OllamaClient};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    info!("Starting scrumloop");
    let cli = Cli::parse();
    debug!(config = ?cli.config, rounds = ?cli.rounds, log_dir = %cli.log_dir, "CLI arguments parsed");

    let config_path = cli.config.as_deref().map(Path::new);
    let config = AppConfig::load(config_path)?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration using default path or defaults");
    }
    let rounds = cli.rounds.unwrap_or(config.meeting.rounds);

    let store = Arc::new(BacklogStore::new(&cli.backlog_file));

    let mut agents = Vec::with_capacity(config.agents.len());
    for agent_config in &config.agents {
        let mut registry = ToolRegistry::new();
        let mut catalog = Vec::new();
        for descriptor in builtin::backlog_tools(&store) {
            catalog.push(descriptor.name().to_string());
            if agent_config
                .tools
                .iter()
                .any(|name| name == descriptor.name())
            {
                registry.register(descriptor)?;
            }
        }
        for name in &agent_config.tools {
            if !catalog.contains(name) {
                warn!(
                    role = agent_config.role.as_str(),
                    tool = name.as_str(),
                    "Ignoring unknown tool in configuration"
                );
            }
        }

        let endpoint = agent_config
            .endpoint
            .clone()
            .unwrap_or_else(|| cli.ollama_url.clone());
        debug!(role = agent_config.role.as_str(), endpoint = endpoint.as_str(), "Creating Ollama provider");
        let provider: Arc<dyn ModelProvider> = Arc::new(OllamaClient::new(endpoint));

        agents.push(Agent::new(
            AgentSpec {
                role: agent_config.role.clone(),
                model: agent_config.model.clone(),
                system_message: agent_config.system_message.clone(),
                is_human: agent_config.is_human,
            },
            registry,
            provider,
            config.sampling.clone(),
            config.meeting.max_deliberations,
            &cli.log_dir,
        ));
    }

    let seed = SeedMessage {
        role: config.meeting.seed_role.clone(),
        content: config.meeting.seed_message.clone(),
    };
    let mut meeting = Meeting::new(agents, rounds, seed);
    let summary = meeting.run().await;

    for entry in &summary.entries {
        println!("{}: {}\n", entry.role, entry.content);
    }
    info!(
        meeting_id = summary.meeting_id.as_str(),
        spoken = summary.entries.len(),
        "Meeting execution finished"
    );
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
