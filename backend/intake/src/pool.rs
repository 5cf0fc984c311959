//! Bounded task-per-photo execution.
//!
//! Every submitted photo gets its own Tokio task and its own reply channel.
//! Each task acknowledges its photo right away. A semaphore then caps how
//! many tasks run the rest of the workflow at once; tasks beyond the cap wait
//! for a permit after their acknowledgement is sent.

use std::sync::Arc;

use anyhow::{Context, Result};
use ocrbot_core::{IncomingPhoto, Reply};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::workflow::{IntakeOutcome, PhotoIntake};

/// Replies buffered per photo before the workflow waits on the consumer.
const REPLY_BUFFER: usize = 16;

/// A submitted photo: its reply stream and the task producing it.
pub struct IntakeJob {
    pub replies: mpsc::Receiver<Reply>,
    pub handle: JoinHandle<Result<IntakeOutcome>>,
}

pub struct IntakePool {
    intake: Arc<PhotoIntake>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl IntakePool {
    pub fn new(intake: Arc<PhotoIntake>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            intake,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Workflow slots not currently in use.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Spawn the workflow for `photo`. Returns immediately; the task acknowledges, then waits for a free slot.
    pub fn submit(&self, photo: IncomingPhoto) -> IntakeJob {
        let (tx, rx) = mpsc::channel(REPLY_BUFFER);
        let intake = Arc::clone(&self.intake);
        let permits = Arc::clone(&self.permits);

        let handle = tokio::spawn(async move {
            intake.acknowledge(&tx).await?;
            let _permit = permits
                .acquire_owned()
                .await
                .context("intake pool is closed")?;
            debug!(photo_id = %photo.id, "Acquired intake slot");
            intake.process_received(&photo, &tx).await
        });

        IntakeJob { replies: rx, handle }
    }
}
