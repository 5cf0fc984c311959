//! Flat-file archive of recognized photos.
//!
//! Each record is a pair of files sharing an `<identity>_<timestamp>` prefix:
//! the original photo and the recognized text. Both files are written to a
//! temp name and renamed into place, and a failed text write removes the
//! photo, so a record is either complete or absent.
//!
//! Records are written one at a time. When a prefix is already taken (the
//! same sender twice within one second) the timestamp gets a `_2`, `_3`, ...
//! suffix instead of overwriting the earlier pair.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use ocrbot_core::SenderIdentity;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::mime_detect::detect_image_extension;

/// Second-granularity timestamp embedded in record names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Paths of one archived photo/text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    pub photo_path: PathBuf,
    pub text_path: PathBuf,
}

pub struct ArchiveWriter {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ArchiveWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the record paths for an identity, a formatted timestamp, and a photo extension.
    pub fn record_paths(&self, identity: &SenderIdentity, timestamp: &str, ext: &str) -> ArchiveRecord {
        let prefix = format!("{identity}_{timestamp}");
        ArchiveRecord {
            photo_path: self.dir.join(format!("{prefix}_photo.{ext}")),
            text_path: self.dir.join(format!("{prefix}_text.txt")),
        }
    }

    /// First record for `timestamp` whose files do not exist yet.
    async fn free_record_paths(
        &self,
        identity: &SenderIdentity,
        timestamp: &str,
        ext: &str,
    ) -> ArchiveRecord {
        let mut record = self.record_paths(identity, timestamp, ext);
        let mut n = 1;
        while is_file(&record.photo_path).await || is_file(&record.text_path).await {
            n += 1;
            record = self.record_paths(identity, &format!("{timestamp}_{n}"), ext);
        }
        if n > 1 {
            warn!(identity = %identity, timestamp, suffix = n, "Archive prefix already taken");
        }
        record
    }

    /// Create the archive directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create archive directory: {}", self.dir.display()))
    }

    /// Check that the archive directory can be created and written to.
    pub async fn check_writable(&self) -> Result<()> {
        self.ensure_dir().await?;
        let marker = self.dir.join(".ocrbot-write-check");
        fs::write(&marker, b"ok")
            .await
            .with_context(|| format!("Archive directory is not writable: {}", self.dir.display()))?;
        fs::remove_file(&marker).await.ok();
        Ok(())
    }

    /// Archive a photo and its recognized text, stamped with the current local time.
    pub async fn archive(
        &self,
        identity: &SenderIdentity,
        payload: &[u8],
        text: &str,
    ) -> Result<ArchiveRecord> {
        self.archive_at(identity, Local::now().naive_local(), payload, text).await
    }

    /// Archive a photo and its recognized text under an explicit timestamp.
    pub async fn archive_at(
        &self,
        identity: &SenderIdentity,
        at: NaiveDateTime,
        payload: &[u8],
        text: &str,
    ) -> Result<ArchiveRecord> {
        self.ensure_dir().await?;

        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let ext = detect_image_extension(payload);

        let _guard = self.write_lock.lock().await;
        let record = self.free_record_paths(identity, &timestamp, ext).await;

        write_atomic(&record.photo_path, payload).await?;
        if let Err(e) = write_atomic(&record.text_path, text.as_bytes()).await {
            if let Err(cleanup) = fs::remove_file(&record.photo_path).await {
                warn!(path = %record.photo_path.display(), error = %cleanup, "Failed to remove orphaned photo");
            }
            return Err(e);
        }

        info!(
            identity = %identity,
            photo = %record.photo_path.display(),
            text = %record.text_path.display(),
            bytes = payload.len(),
            "Archived OCR result"
        );
        Ok(record)
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

/// Write to a uniquely named `<path>.<uuid>.tmp`, then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp_path = PathBuf::from(tmp_name);

    debug!(path = %tmp_path.display(), bytes = bytes.len(), "Writing archive file");
    if let Err(e) = fs::write(&tmp_path, bytes).await {
        fs::remove_file(&tmp_path).await.ok();
        return Err(e).with_context(|| format!("Failed to write {}", tmp_path.display()));
    }

    if let Err(e) = fs::rename(&tmp_path, path).await {
        fs::remove_file(&tmp_path).await.ok();
        return Err(e)
            .with_context(|| format!("Failed to move archive file into place: {}", path.display()));
    }
    Ok(())
}
