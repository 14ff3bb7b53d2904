//! Upstash Redis REST transport
//!
//! Events are pushed onto a Redis list with `LPUSH`; the mobile app drains the
//! other end with `RPOP`, so the list behaves as a FIFO queue.
//!
//! `LPUSH` only answers with the new list length, which repeats as the list
//! drains, so the handle is built from the pushed event's `id` instead.

use serde::Deserialize;
use ureq::Agent;
use uuid::Uuid;

use super::{Destination, MessageHandle, QueueClient, TransportError};

/// List the mobile consumer polls
pub const DEFAULT_LIST_KEY: &str = "timeline-events";

/// Upstash REST reply: `{"result": ...}` on success, `{"error": "..."}` otherwise
#[derive(Debug, Deserialize)]
struct RestReply {
    result: Option<serde_json::Value>,
    error: Option<String>,
}

pub struct UpstashQueue {
    agent: Agent,
    token: String,
    list_key: String,
}

impl UpstashQueue {
    pub fn new(token: impl Into<String>, list_key: impl Into<String>) -> Self {
        // Error statuses carry a JSON body worth reporting, so read them like any other reply
        let config = Agent::config_builder().http_status_as_error(false).build();

        Self {
            agent: config.into(),
            token: token.into(),
            list_key: list_key.into(),
        }
    }

    fn endpoint(&self, destination: &Destination) -> String {
        format!("{}/lpush/{}", destination.url.trim_end_matches('/'), self.list_key)
    }
}

impl QueueClient for UpstashQueue {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError> {
        let url = self.endpoint(destination);
        log::debug!(
            "LPUSH {} ({} bytes, region={})",
            url,
            body.len(),
            destination.region.as_deref().unwrap_or("-")
        );

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .send(body.as_bytes())
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let reply: Option<RestReply> = serde_json::from_str(&response_body).ok();

        if let Some(RestReply { error: Some(error), .. }) = reply {
            return Err(TransportError::Rejected(error));
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: response_body,
            });
        }

        match reply.and_then(|r| r.result) {
            Some(serde_json::Value::Number(_)) => Ok(MessageHandle::new(format!(
                "{}:{}",
                self.list_key,
                message_id(body)
            ))),
            _ => Err(TransportError::InvalidResponse(response_body)),
        }
    }
}

/// The payload's `id`, or a fresh one for payloads without it
fn message_id(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("id").and_then(|id| id.as_str()).map(str::to_string))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
