//! Payload inspection
//!
//! Reads an event as it travels over the queue and checks it the way the
//! mobile consumer would decode it.

use eyre::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use timeline_publish::Event;

use crate::cli::OutputFormat;
use crate::commands::publish::print_event;

pub fn run(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let payload = match file {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };

    let event = decode(&payload)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&event)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&event)?),
        OutputFormat::Text => print_event(&event),
    }

    Ok(())
}

/// Parse a payload and require a valid timestamp
pub fn decode(payload: &str) -> Result<Event> {
    let event = Event::from_payload(payload.trim()).context("Invalid event payload")?;
    event
        .timestamp_utc()
        .context(format!("Invalid event timestamp: {}", event.timestamp()))?;
    Ok(event)
}
