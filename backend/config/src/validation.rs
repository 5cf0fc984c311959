//! Config validation: schema checks with user-friendly error messages.

use crate::schema::OcrBotConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `<bot id>:<secret>` as issued by BotFather.
static BOT_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5,}:[A-Za-z0-9_-]{20,}$").unwrap());

/// Tesseract traineddata names: `eng`, `rus`, `chi_sim`, ...
static LANGUAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &OcrBotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_telegram(config, &mut report);
    validate_ocr(config, &mut report);
    validate_runtime(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_telegram(config: &OcrBotConfig, report: &mut ValidationReport) {
    match config.bot_token() {
        None => report.error(
            "telegram.botToken",
            "Telegram bot token is required (set it in the config or TELEGRAM_BOT_TOKEN)",
        ),
        Some(token) if !BOT_TOKEN_PATTERN.is_match(token) => report.warn(
            "telegram.botToken",
            "Token does not look like '<bot id>:<secret>'; Telegram will likely reject it",
        ),
        Some(_) => {}
    }
}

fn validate_ocr(config: &OcrBotConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };

    if let Some(path) = &ocr.tesseract_path {
        if path.trim().is_empty() {
            report.error("ocr.tesseractPath", "tesseractPath cannot be empty");
        }
    }

    if let Some(languages) = &ocr.languages {
        if languages.is_empty() {
            report.error("ocr.languages", "At least one OCR language is required");
        }
        for (i, lang) in languages.iter().enumerate() {
            if !LANGUAGE_PATTERN.is_match(lang) {
                report.error(
                    format!("ocr.languages[{i}]"),
                    format!("'{lang}' is not a Tesseract language name"),
                );
            }
        }
    }

    if ocr.timeout_secs == Some(0) {
        report.error("ocr.timeoutSecs", "timeoutSecs must be >= 1");
    }
}

fn validate_runtime(config: &OcrBotConfig, report: &mut ValidationReport) {
    let Some(runtime) = &config.runtime else { return };
    match runtime.max_concurrent_photos {
        Some(0) => report.error("runtime.maxConcurrentPhotos", "maxConcurrentPhotos must be >= 1"),
        Some(n) if n > 64 => report.warn(
            "runtime.maxConcurrentPhotos",
            format!("{n} concurrent Tesseract processes may exhaust CPU and memory"),
        ),
        _ => {}
    }
}

fn validate_logging(config: &OcrBotConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else { return };
    // Directive strings such as "ocrbot=debug,teloxide=warn" are passed through to the filter.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        report.warn(
            "logging.level",
            format!("Unknown log level '{level}'. Use one of: {}", LOG_LEVELS.join(", ")),
        );
    }
}
