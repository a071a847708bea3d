use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "scrumloop",
    version,
    about = "Multi-agent Scrum meeting simulator driven by local LLMs"
)]
pub struct Cli {
    /// Base URL of the Ollama endpoint for agents without one of their own
    #[arg(long, default_value = "http://127.0.0.1:11434")]
    pub ollama_url: String,
    /// Path to the TOML configuration file
    #[arg(long)]
    pub config: Option<String>,
    /// Overrides the configured number of meeting rounds
    #[arg(long)]
    pub rounds: Option<usize>,
    /// Directory for the per-agent conversation logs
    #[arg(long, default_value = "logs")]
    pub log_dir: String,
    /// Path of the product backlog file the story tools write to
    #[arg(long, default_value = "user_stories.json")]
    pub backlog_file: String,
}
