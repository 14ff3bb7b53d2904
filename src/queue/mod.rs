//! Message queue transport
//!
//! The publisher hands one serialized event to a [`QueueClient`] and gets back
//! the handle the queue acknowledged it with. Implementations:
//! - [`SqsQueue`] - AWS SQS `SendMessage`
//! - [`UpstashQueue`] - Upstash Redis REST list (`LPUSH`)
//! - [`DryRunQueue`] - no network, for previews

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod dry_run;
pub mod sqs;
pub mod upstash;

pub use dry_run::DryRunQueue;
pub use sqs::SqsQueue;
pub use upstash::UpstashQueue;

/// Where a payload is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Queue endpoint URL
    pub url: String,
    /// Region or locality hint, passed through to the transport
    pub region: Option<String>,
}

/// Acknowledgment id returned by the queue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageHandle(String);

impl MessageHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Queue request failed: {0}")]
    Request(String),
    #[error("Queue returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Queue rejected message: {0}")]
    Rejected(String),
    #[error("Unexpected queue response: {0}")]
    InvalidResponse(String),
}

/// A queue that accepts one text payload per call
pub trait QueueClient {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError>;
}

impl<Q: QueueClient + ?Sized> QueueClient for &Q {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError> {
        (**self).send(destination, body)
    }
}

impl<Q: QueueClient + ?Sized> QueueClient for Box<Q> {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError> {
        (**self).send(destination, body)
    }
}
