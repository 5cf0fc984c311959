//! Photo Event Logger
//!
//! Lifecycle events of one photo emitted as structured `tracing` records under the `photo_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhotoEvent {
    Received {
        identity: String,
        file_id: String,
    },
    NoText,
    Archived {
        photo_path: String,
        messages: usize,
    },
    Failed {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub chat_id: i64,
    pub photo_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PhotoEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the entry for an event, scrubbing any error text.
    pub fn entry(chat_id: i64, photo_id: &str, mut event: PhotoEvent) -> EventLogEntry {
        if let PhotoEvent::Failed { error_msg } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        EventLogEntry {
            chat_id,
            photo_id: photo_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(chat_id: i64, photo_id: &str, event: PhotoEvent) {
        let entry = Self::entry(chat_id, photo_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "photo_events", chat_id, photo_id, event = %json, "Photo event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_events_are_redacted() {
        let entry = EventLogger::entry(
            7,
            "p1",
            PhotoEvent::Failed {
                error_msg: "GET https://api.telegram.org/bot123456:secret_part/GetFile failed".into(),
            },
        );
        match entry.event {
            PhotoEvent::Failed { error_msg } => {
                assert!(!error_msg.contains("secret_part"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let entry = EventLogger::entry(7, "p1", PhotoEvent::NoText);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "no_text");
        assert_eq!(json["photo_id"], "p1");
        assert_eq!(json["chat_id"], 7);
    }
}
