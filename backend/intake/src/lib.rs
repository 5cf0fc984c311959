//! Photo intake: the path a photo takes from the chat to the archive and back.
//!
//! `PhotoIntake` runs one photo through download, recognition, archival and
//! reply. `IntakePool` runs many of them as independent tasks under a
//! concurrency limit, each with its own reply channel.

pub mod messages;
pub mod pool;
pub mod workflow;

pub use messages::{split_message, PROCESSING_FAILED, TELEGRAM_MESSAGE_LIMIT};
pub use pool::{IntakeJob, IntakePool};
pub use workflow::{IntakeOutcome, PhotoIntake};
