use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "timeline",
    about = "Publish timeline events for the Live Timeline app",
    version,
    after_help = "Logs are written to: ~/.local/share/timeline/logs/timeline.log\n\nEnvironment: TIMELINE_QUEUE_KIND (sqs or upstash), TIMELINE_QUEUE_URL, TIMELINE_QUEUE_TOKEN, TIMELINE_REGION (or AWS_REGION), TIMELINE_CONFIG"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to timeline.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish an event to the timeline queue
    Publish(PublishArgs),

    /// Validate and print an event payload
    Decode {
        /// Payload file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Args, Debug)]
pub struct PublishArgs {
    /// Event title
    #[arg(long)]
    pub title: String,

    /// Event body/details
    #[arg(long, default_value = "")]
    pub body: String,

    /// Event status: info, in_progress, success, warning, error
    #[arg(long, default_value = "info")]
    pub status: String,

    /// Agent identifier
    #[arg(long, default_value = "default")]
    pub agent_id: String,

    /// Task ID for upsert grouping (auto-generated if omitted)
    #[arg(long)]
    pub task_id: Option<String>,

    /// Category for filtering
    #[arg(long, default_value = "")]
    pub category: String,

    /// Queue URL (or set TIMELINE_QUEUE_URL)
    #[arg(long)]
    pub queue_url: Option<String>,

    /// Region hint (or set TIMELINE_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Build the event without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (default: text for TTY, json for pipes)
    #[arg(long, short = 'o', value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the default config file location
    Path,
}
