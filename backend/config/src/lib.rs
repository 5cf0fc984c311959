//! `ocrbot-config`: ocrbot runtime configuration management.
//!
//! Provides:
//! - Typed config schema (Telegram, OCR, archive, runtime, logging)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution
//! - Config redaction for safe logging/display
//! - Default value application
//! - Schema validation
//!
//! [`load_resolved`] is the entry point used at startup.

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::{apply_all_defaults, apply_bot_token_fallback, BOT_TOKEN_ENV};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use redact::redact;
pub use schema::OcrBotConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load the config file and resolve it: env substitution, token fallback, defaults.
///
/// Validation is left to the caller so it can be reported once logging is up.
pub async fn load_resolved(path: &Path) -> Result<OcrBotConfig> {
    let raw_config = load_config(path).await?;
    resolve(raw_config, std::env::var(BOT_TOKEN_ENV).ok())
}

/// The pure part of [`load_resolved`].
pub fn resolve(raw_config: OcrBotConfig, env_token: Option<String>) -> Result<OcrBotConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: OcrBotConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_bot_token_fallback(config, env_token);
    Ok(apply_all_defaults(config))
}

/// Emit every finding of a validation report through `tracing`.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_token_fills_missing_file_token() {
        let cfg = resolve(OcrBotConfig::default(), Some("42:from-env".into())).unwrap();
        assert_eq!(cfg.bot_token(), Some("42:from-env"));
        assert_eq!(cfg.max_concurrent_photos(), 4);
    }

    #[test]
    fn file_token_wins_over_env() {
        let raw: OcrBotConfig =
            serde_yaml::from_str("telegram:\n  botToken: \"42:from-file\"\n").unwrap();
        let cfg = resolve(raw, Some("42:from-env".into())).unwrap();
        assert_eq!(cfg.bot_token(), Some("42:from-file"));
    }
}
