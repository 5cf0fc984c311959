//! ocrbot configuration schema.
//!
//! Every section is optional in the YAML file; `defaults::apply_all_defaults`
//! fills in what is missing, and the accessors below fall back to the same
//! defaults so a bare `OcrBotConfig::default()` is usable too.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_ARCHIVE_DIR, DEFAULT_LANGUAGES, DEFAULT_LOG_LEVEL, DEFAULT_MAX_CONCURRENT_PHOTOS,
    DEFAULT_OCR_TIMEOUT_SECS, DEFAULT_TESSERACT_PATH,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for ocrbot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrBotConfig {
    /// Telegram bot credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramConfig>,

    /// OCR engine settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,

    /// Where recognized photos are stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveConfig>,

    /// Worker limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_photos: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Effective values
// ---------------------------------------------------------------------------

impl OcrBotConfig {
    pub fn bot_token(&self) -> Option<&str> {
        self.telegram
            .as_ref()
            .and_then(|t| t.bot_token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn tesseract_path(&self) -> PathBuf {
        PathBuf::from(
            self.ocr
                .as_ref()
                .and_then(|o| o.tesseract_path.as_deref())
                .unwrap_or(DEFAULT_TESSERACT_PATH),
        )
    }

    pub fn languages(&self) -> Vec<String> {
        self.ocr
            .as_ref()
            .and_then(|o| o.languages.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect())
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(
            self.ocr
                .as_ref()
                .and_then(|o| o.timeout_secs)
                .unwrap_or(DEFAULT_OCR_TIMEOUT_SECS),
        )
    }

    pub fn archive_dir(&self) -> PathBuf {
        PathBuf::from(
            self.archive
                .as_ref()
                .and_then(|a| a.dir.as_deref())
                .unwrap_or(DEFAULT_ARCHIVE_DIR),
        )
    }

    pub fn max_concurrent_photos(&self) -> usize {
        self.runtime
            .as_ref()
            .and_then(|r| r.max_concurrent_photos)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_PHOTOS) as usize
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_deref())
            .map(PathBuf::from)
    }
}
