//! AWS SQS transport
//!
//! One `SendMessage` per event. Credentials come from the standard AWS
//! provider chain; the region comes from the destination.

use aws_sdk_sqs::Client;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::DisplayErrorContext;
use tokio::runtime::Runtime;

use super::{Destination, MessageHandle, QueueClient, TransportError};

/// Region used when the destination names none
pub const DEFAULT_REGION: &str = "us-east-1";

/// Fields of a single `SendMessage` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage<'a> {
    pub queue_url: &'a str,
    pub region: &'a str,
    pub message_body: &'a str,
}

impl<'a> SendMessage<'a> {
    pub fn new(destination: &'a Destination, body: &'a str) -> Self {
        Self {
            queue_url: &destination.url,
            region: destination.region.as_deref().unwrap_or(DEFAULT_REGION),
            message_body: body,
        }
    }
}

/// Blocking SQS client; owns the runtime the SDK runs on
pub struct SqsQueue {
    runtime: Runtime,
}

impl SqsQueue {
    pub fn new() -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to start runtime: {}", e)))?;

        Ok(Self { runtime })
    }

    async fn send_message(message: SendMessage<'_>) -> Result<MessageHandle, TransportError> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(message.region.to_string()))
            .load()
            .await;
        let client = Client::new(&config);

        let output = client
            .send_message()
            .queue_url(message.queue_url)
            .message_body(message.message_body)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                match e.as_service_error() {
                    Some(_) => TransportError::Rejected(detail),
                    None => TransportError::Request(detail),
                }
            })?;

        output
            .message_id()
            .map(MessageHandle::new)
            .ok_or_else(|| TransportError::InvalidResponse("SendMessage returned no MessageId".to_string()))
    }
}

impl QueueClient for SqsQueue {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError> {
        let message = SendMessage::new(destination, body);
        log::debug!(
            "SendMessage {} ({} bytes, region={})",
            message.queue_url,
            body.len(),
            message.region
        );

        self.runtime.block_on(Self::send_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE_URL: &str = "https://sqs.eu-west-1.amazonaws.com/123456789012/timeline-events";

    #[test]
    fn test_send_message_uses_destination_region() {
        let destination = Destination {
            url: QUEUE_URL.to_string(),
            region: Some("eu-west-1".to_string()),
        };

        let message = SendMessage::new(&destination, r#"{"title":"hi"}"#);
        assert_eq!(
            message,
            SendMessage {
                queue_url: QUEUE_URL,
                region: "eu-west-1",
                message_body: r#"{"title":"hi"}"#,
            }
        );
    }

    #[test]
    fn test_send_message_defaults_region() {
        let destination = Destination {
            url: QUEUE_URL.to_string(),
            region: None,
        };

        let message = SendMessage::new(&destination, "{}");
        assert_eq!(message.region, "us-east-1");
        assert_eq!(message.queue_url, QUEUE_URL);
    }

    #[test]
    fn test_new_starts_runtime() {
        assert!(SqsQueue::new().is_ok());
    }
}
