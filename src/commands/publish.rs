use colored::*;
use eyre::{Context, Result};

use timeline_publish::queue::{DryRunQueue, QueueClient, SqsQueue, UpstashQueue};
use timeline_publish::{DestinationOverride, Event, EventStatus, PublishError, PublishRequest, Published, Publisher};

use crate::cli::{OutputFormat, PublishArgs};
use crate::config::{Config, QueueKind};

pub fn run(args: PublishArgs, config: &Config) -> Result<()> {
    let format = OutputFormat::resolve(args.format);
    let dry_run = args.dry_run;
    let settings = config.publisher_settings();

    let destination = DestinationOverride {
        url: args.queue_url.clone(),
        region: args.region.clone(),
    };
    // Status and destination are checked before any transport is set up
    let outgoing = settings
        .prepare(request_from_args(args), &destination)
        .context("Failed to publish event")?;
    log::debug!(
        "Prepared event {} for {}",
        outgoing.event().id(),
        outgoing.destination().url
    );

    let queue = build_queue(dry_run, config).context("Failed to publish event")?;
    let published = Publisher::new(queue, settings)
        .send(outgoing)
        .context("Failed to publish event")?;

    log::info!(
        "Published event {} for task {} as {}",
        published.event.id(),
        published.event.task_id(),
        published.message_handle
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&published)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&published)?),
        OutputFormat::Text => print_published(&published),
    }

    Ok(())
}

fn build_queue(dry_run: bool, config: &Config) -> Result<Box<dyn QueueClient>, PublishError> {
    if dry_run {
        return Ok(Box::new(DryRunQueue::new()));
    }

    match config.queue.kind {
        QueueKind::Sqs => Ok(Box::new(SqsQueue::new()?)),
        QueueKind::Upstash => {
            let token = config
                .queue
                .token
                .clone()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    PublishError::ConfigurationMissing(
                        "Upstash token not configured (set TIMELINE_QUEUE_TOKEN or queue.token)".to_string(),
                    )
                })?;

            Ok(Box::new(UpstashQueue::new(token, config.queue.list_key.clone())))
        }
    }
}

fn request_from_args(args: PublishArgs) -> PublishRequest {
    let mut request = PublishRequest::new(args.title)
        .body(args.body)
        .status(args.status)
        .agent_id(args.agent_id)
        .category(args.category);
    request.task_id = args.task_id;
    request
}

fn status_colored(status: EventStatus) -> ColoredString {
    match status {
        EventStatus::Info => status.label().blue(),
        EventStatus::InProgress => status.label().yellow(),
        EventStatus::Success => status.label().green(),
        EventStatus::Warning => status.label().truecolor(255, 165, 0),
        EventStatus::Error => status.label().red(),
    }
}

fn print_published(published: &Published) {
    println!(
        "{} Published {}",
        "✓".green(),
        published.message_handle.to_string().cyan()
    );
    print_event(&published.event);
}

pub fn print_event(event: &Event) {
    println!("  {} [{}]", event.title().bold(), status_colored(event.status()));
    if !event.body().is_empty() {
        println!("  {}", event.body());
    }
    println!("  {}: {}", "id".dimmed(), event.id());
    println!("  {}: {}", "task_id".dimmed(), event.task_id());
    println!("  {}: {}", "agent_id".dimmed(), event.agent_id());
    if !event.category().is_empty() {
        println!("  {}: {}", "category".dimmed(), event.category());
    }
    println!("  {}: {}", "timestamp".dimmed(), event.timestamp());
}
