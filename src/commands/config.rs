use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Path => {
            println!("{}", Config::config_dir().join("timeline.yaml").display());
            Ok(())
        }
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    let config = config.redacted();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Text => {
            let unset = || "(unset)".dimmed().to_string();

            println!("{}", "Timeline Configuration".bold());
            println!();
            println!("log_level: {}", config.log_level.as_filter());
            println!();
            println!("{}:", "queue".cyan());
            println!("  url: {}", config.queue.url.clone().unwrap_or_else(unset));
            println!("  region: {}", config.queue.region.clone().unwrap_or_else(unset));
            println!("  token: {}", config.queue.token.clone().unwrap_or_else(unset));
            println!("  list_key: {}", config.queue.list_key);
            match config.queue.max_payload_bytes {
                Some(limit) => println!("  max_payload_bytes: {}", limit),
                None => println!("  max_payload_bytes: {}", "(no limit)".dimmed()),
            }
        }
    }

    Ok(())
}
