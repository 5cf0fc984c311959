//! Structured logging for ocrbot.
//!
//! Handles log redaction, console and rolling NDJSON output, and per-photo event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, PhotoEvent};
pub use logger::{LOG_FILE_NAME, init_logger};
pub use redact::redact_sensitive_data;
