//! Timeline event record
//!
//! The flat record the mobile timeline consumes. Events sharing a `task_id`
//! are treated downstream as updates of the same logical task.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::PublishError;

/// `agent_id` used when the caller does not name a source
pub const DEFAULT_AGENT_ID: &str = "default";

/// Event status, rendered by the consumer as an icon and color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Info,
    InProgress,
    Success,
    Warning,
    Error,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Info,
        EventStatus::InProgress,
        EventStatus::Success,
        EventStatus::Warning,
        EventStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Info => "info",
            EventStatus::InProgress => "in_progress",
            EventStatus::Success => "success",
            EventStatus::Warning => "warning",
            EventStatus::Error => "error",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Info => "Info",
            EventStatus::InProgress => "In Progress",
            EventStatus::Success => "Success",
            EventStatus::Warning => "Warning",
            EventStatus::Error => "Error",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = PublishError;

    /// Exact match only: the wire values are the accepted spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = EventStatus::ALL.iter().map(|s| s.as_str()).collect();
                PublishError::InvalidArgument(format!(
                    "invalid status '{}' (expected one of: {})",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

/// Caller-supplied fields of an event, before identifiers and time are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub body: String,
    pub status: EventStatus,
    pub agent_id: String,
    pub task_id: Option<String>,
    pub category: String,
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            status: EventStatus::default(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            task_id: None,
            category: String::new(),
        }
    }
}

/// A constructed timeline event
///
/// Fields are private so an event cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: String,
    agent_id: String,
    task_id: String,
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    body: String,
    status: EventStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    category: String,
    timestamp: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Build an event stamped with the current UTC time
    pub fn new(draft: EventDraft) -> Self {
        Self::at(draft, Utc::now())
    }

    /// Build an event stamped with the given time
    pub fn at(draft: EventDraft, now: DateTime<Utc>) -> Self {
        let task_id = match draft.task_id {
            Some(task_id) if !task_id.is_empty() => task_id,
            _ => Uuid::new_v4().to_string(),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            agent_id: draft.agent_id,
            task_id,
            title: draft.title,
            body: draft.body,
            status: draft.status,
            category: draft.category,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Parse the timestamp back into a UTC instant
    pub fn timestamp_utc(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.timestamp).map(|ts| ts.with_timezone(&Utc))
    }

    /// Encode as the flat JSON object sent over the queue
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a queue payload
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_status_from_str() {
        assert_eq!("info".parse::<EventStatus>().unwrap(), EventStatus::Info);
        assert_eq!("in_progress".parse::<EventStatus>().unwrap(), EventStatus::InProgress);
        assert_eq!("success".parse::<EventStatus>().unwrap(), EventStatus::Success);
        assert_eq!("warning".parse::<EventStatus>().unwrap(), EventStatus::Warning);
        assert_eq!("error".parse::<EventStatus>().unwrap(), EventStatus::Error);
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        for bad in ["bogus", "", "Info", "in-progress", "SUCCESS", " info"] {
            let err = bad.parse::<EventStatus>().unwrap_err();
            assert!(matches!(err, PublishError::InvalidArgument(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_status_error_lists_allowed_values() {
        let err = "bogus".parse::<EventStatus>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("in_progress"));
    }

    #[test]
    fn test_status_display_matches_wire() {
        for status in EventStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert_eq!(EventStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn test_draft_defaults() {
        let draft = EventDraft::new("Build passed");
        assert_eq!(draft.body, "");
        assert_eq!(draft.status, EventStatus::Info);
        assert_eq!(draft.agent_id, DEFAULT_AGENT_ID);
        assert_eq!(draft.category, "");
        assert!(draft.task_id.is_none());
    }

    #[test]
    fn test_event_generates_ids() {
        let event = Event::new(EventDraft::new("x"));
        assert!(Uuid::parse_str(event.id()).is_ok());
        assert!(Uuid::parse_str(event.task_id()).is_ok());
        assert_ne!(event.id(), event.task_id());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let mut ids = HashSet::new();
        let mut task_ids = HashSet::new();
        for _ in 0..500 {
            let event = Event::new(EventDraft::new("x"));
            assert!(ids.insert(event.id().to_string()));
            assert!(task_ids.insert(event.task_id().to_string()));
        }
    }

    #[test]
    fn test_event_keeps_explicit_task_id() {
        let mut draft = EventDraft::new("Deploying v1.3");
        draft.task_id = Some("deploy-42".to_string());
        let first = Event::new(draft.clone());
        let second = Event::new(draft);
        assert_eq!(first.task_id(), "deploy-42");
        assert_eq!(second.task_id(), "deploy-42");
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_event_empty_task_id_is_generated() {
        let mut draft = EventDraft::new("x");
        draft.task_id = Some(String::new());
        let event = Event::new(draft);
        assert!(Uuid::parse_str(event.task_id()).is_ok());
    }

    #[test]
    fn test_event_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 3, 12, 0, 0).unwrap();
        let event = Event::at(EventDraft::new("x"), now);
        assert_eq!(event.timestamp(), "2026-01-03T12:00:00.000000+00:00");
        assert_eq!(event.timestamp_utc().unwrap(), now);
    }

    #[test]
    fn test_payload_is_flat_with_expected_keys() {
        let event = Event::new(EventDraft::new("Build passed"));
        let value: serde_json::Value = serde_json::from_str(&event.to_payload().unwrap()).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["agent_id", "body", "category", "id", "status", "task_id", "timestamp", "title"]
        );
        assert!(object.values().all(|v| v.is_string()));
        assert_eq!(object["status"], "info");
    }

    #[test]
    fn test_payload_decodes_back() {
        let mut draft = EventDraft::new("Deploy complete");
        draft.body = "all green".to_string();
        draft.status = EventStatus::Success;
        draft.agent_id = "deployer".to_string();
        draft.task_id = Some("deploy-42".to_string());
        draft.category = "ci".to_string();
        let event = Event::new(draft);

        let decoded = Event::from_payload(&event.to_payload().unwrap()).unwrap();
        assert_eq!(decoded, event);
        assert!(decoded.timestamp_utc().is_ok());
    }

    #[test]
    fn test_decode_tolerates_missing_body_and_category() {
        let payload = r#"{
            "id": "abc",
            "agent_id": "ci",
            "task_id": "t-1",
            "title": "Build",
            "body": null,
            "status": "warning",
            "timestamp": "2026-01-03T12:00:00Z"
        }"#;
        let event = Event::from_payload(payload).unwrap();
        assert_eq!(event.body(), "");
        assert_eq!(event.category(), "");
        assert_eq!(event.status(), EventStatus::Warning);
        assert!(event.timestamp_utc().is_ok());
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let payload = r#"{"id":"a","agent_id":"b","task_id":"c","title":"d","status":"bogus","timestamp":"2026-01-03T12:00:00Z"}"#;
        assert!(Event::from_payload(payload).is_err());
    }
}
