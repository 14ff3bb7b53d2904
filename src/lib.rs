//! Publish timeline events for the Live Timeline app
//!
//! ```no_run
//! use timeline_publish::publisher::{DestinationOverride, PublishRequest, Publisher, PublisherSettings};
//! use timeline_publish::queue::UpstashQueue;
//!
//! let queue = UpstashQueue::new("token", "timeline-events");
//! let publisher = Publisher::new(queue, PublisherSettings::default());
//! let published = publisher.publish(
//!     PublishRequest::new("Build passed").status("success").agent_id("ci"),
//!     &DestinationOverride::url("https://example.upstash.io"),
//! )?;
//! println!("{}", published.message_handle);
//! # Ok::<(), timeline_publish::error::PublishError>(())
//! ```

pub mod error;
pub mod event;
pub mod publisher;
pub mod queue;

pub use error::{ErrorKind, PublishError};
pub use event::{Event, EventStatus};
pub use publisher::{DestinationOverride, Outgoing, PublishRequest, Published, Publisher, PublisherSettings};
