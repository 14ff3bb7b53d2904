//! Event publisher
//!
//! Builds an [`Event`] from caller fields, encodes it, and submits it to a
//! [`QueueClient`] in a single call. Nothing is retried and nothing is kept
//! after the call returns.
//!
//! [`PublisherSettings::prepare`] runs every check that needs no queue, so a
//! caller can validate before it has a transport in hand.

use serde::Serialize;

use crate::error::PublishError;
use crate::event::{DEFAULT_AGENT_ID, Event, EventDraft, EventStatus};
use crate::queue::{Destination, MessageHandle, QueueClient};

/// SQS message size limit
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 256 * 1024;

/// Fields for one event; everything but the title is optional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub title: String,
    pub body: String,
    /// Wire spelling of an [`EventStatus`]; validated at publish time
    pub status: String,
    pub agent_id: String,
    pub task_id: Option<String>,
    pub category: String,
}

impl PublishRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            status: EventStatus::default().to_string(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            task_id: None,
            category: String::new(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    /// Group this event with earlier ones of the same task
    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    fn into_draft(self) -> Result<EventDraft, PublishError> {
        let status = self.status.parse::<EventStatus>()?;

        Ok(EventDraft {
            title: self.title,
            body: self.body,
            status,
            agent_id: self.agent_id,
            task_id: self.task_id,
            category: self.category,
        })
    }
}

/// Destination fields that may each be given or left to the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationOverride {
    pub url: Option<String>,
    pub region: Option<String>,
}

impl DestinationOverride {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            region: None,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// Defaults resolved once by whoever builds the publisher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherSettings {
    pub destination: DestinationOverride,
    pub max_payload_bytes: Option<usize>,
}

impl PublisherSettings {
    /// Explicit fields win over the settings, each resolved on its own
    pub fn resolve_destination(&self, explicit: &DestinationOverride) -> Result<Destination, PublishError> {
        let defaults = &self.destination;

        let url = non_empty(explicit.url.as_ref())
            .or_else(|| non_empty(defaults.url.as_ref()))
            .ok_or_else(|| {
                PublishError::ConfigurationMissing("no queue destination given and no default configured".to_string())
            })?;
        let region = non_empty(explicit.region.as_ref()).or_else(|| non_empty(defaults.region.as_ref()));

        Ok(Destination { url, region })
    }

    /// Resolve the destination, validate the request and encode the event
    pub fn prepare(&self, request: PublishRequest, destination: &DestinationOverride) -> Result<Outgoing, PublishError> {
        let destination = self.resolve_destination(destination)?;
        let event = Event::new(request.into_draft()?);

        let payload = event
            .to_payload()
            .map_err(|e| PublishError::InvalidArgument(format!("event could not be encoded: {}", e)))?;

        if let Some(limit) = self.max_payload_bytes
            && payload.len() > limit
        {
            return Err(PublishError::InvalidArgument(format!(
                "payload is {} bytes, queue limit is {} bytes",
                payload.len(),
                limit
            )));
        }

        Ok(Outgoing {
            destination,
            event,
            payload,
        })
    }
}

/// A validated event ready for exactly one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    destination: Destination,
    event: Event,
    payload: String,
}

impl Outgoing {
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn event(&self) -> &Event {
        &self.event
    }
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Published {
    #[serde(rename = "message_id")]
    pub message_handle: MessageHandle,
    pub event: Event,
}

pub struct Publisher<Q> {
    queue: Q,
    settings: PublisherSettings,
}

impl<Q: QueueClient> Publisher<Q> {
    pub fn new(queue: Q, settings: PublisherSettings) -> Self {
        Self { queue, settings }
    }

    /// Build, encode and send one event
    pub fn publish(&self, request: PublishRequest, destination: &DestinationOverride) -> Result<Published, PublishError> {
        let outgoing = self.settings.prepare(request, destination)?;
        self.send(outgoing)
    }

    /// Send an already prepared event
    pub fn send(&self, outgoing: Outgoing) -> Result<Published, PublishError> {
        let Outgoing {
            destination,
            event,
            payload,
        } = outgoing;

        let message_handle = self.queue.send(&destination, &payload)?;
        log::debug!(
            "Published event {} (task {}) as {}",
            event.id(),
            event.task_id(),
            message_handle
        );

        Ok(Published { message_handle, event })
    }
}
