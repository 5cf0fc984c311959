//! Config defaults: applies default values to parsed config.

use crate::schema::{
    ArchiveConfig, LoggingConfig, OcrBotConfig, OcrConfig, RuntimeConfig, TelegramConfig,
};

/// Environment variable consulted when the config file carries no bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

pub const DEFAULT_TESSERACT_PATH: &str = "tesseract";

/// English and Russian, combined as `eng+rus` on the Tesseract command line.
pub const DEFAULT_LANGUAGES: &[&str] = &["eng", "rus"];

pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_ARCHIVE_DIR: &str = "ocr_results";

pub const DEFAULT_MAX_CONCURRENT_PHOTOS: u32 = 4;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: OcrBotConfig) -> OcrBotConfig {
    let config = apply_ocr_defaults(config);
    let config = apply_archive_defaults(config);
    let config = apply_runtime_defaults(config);
    apply_logging_defaults(config)
}

/// Use `token` (normally `$TELEGRAM_BOT_TOKEN`) when the file has no bot token.
pub fn apply_bot_token_fallback(mut config: OcrBotConfig, token: Option<String>) -> OcrBotConfig {
    if config.bot_token().is_some() {
        return config;
    }
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.telegram.get_or_insert_with(TelegramConfig::default).bot_token = Some(token);
    }
    config
}

fn apply_ocr_defaults(mut config: OcrBotConfig) -> OcrBotConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    if ocr.tesseract_path.is_none() {
        ocr.tesseract_path = Some(DEFAULT_TESSERACT_PATH.to_string());
    }
    if ocr.languages.is_none() {
        ocr.languages = Some(DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect());
    }
    if ocr.timeout_secs.is_none() {
        ocr.timeout_secs = Some(DEFAULT_OCR_TIMEOUT_SECS);
    }
    config
}

fn apply_archive_defaults(mut config: OcrBotConfig) -> OcrBotConfig {
    let archive = config.archive.get_or_insert_with(ArchiveConfig::default);
    if archive.dir.is_none() {
        archive.dir = Some(DEFAULT_ARCHIVE_DIR.to_string());
    }
    config
}

fn apply_runtime_defaults(mut config: OcrBotConfig) -> OcrBotConfig {
    let runtime = config.runtime.get_or_insert_with(RuntimeConfig::default);
    if runtime.max_concurrent_photos.is_none() {
        runtime.max_concurrent_photos = Some(DEFAULT_MAX_CONCURRENT_PHOTOS);
    }
    config
}

fn apply_logging_defaults(mut config: OcrBotConfig) -> OcrBotConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
