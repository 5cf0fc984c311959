//! Config plumbing for the CLI: locating, resolving, printing and initializing the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ocrbot_config::{
    apply_all_defaults, config_dir, config_file_path, redact, write_config, OcrBotConfig,
};
use ocrbot_understanding::TesseractConfig;

/// `config.yaml` inside `$OCRBOT_CONFIG_DIR` or `~/.ocrbot`.
pub fn default_config_path() -> PathBuf {
    config_file_path(&config_dir())
}

/// Recognition adapter settings derived from the `ocr` section.
pub fn tesseract_config(config: &OcrBotConfig) -> TesseractConfig {
    TesseractConfig {
        binary: config.tesseract_path(),
        languages: config.languages(),
        timeout: config.ocr_timeout(),
    }
}

/// The effective config as YAML, with secrets masked.
pub fn render_redacted(config: &OcrBotConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    serde_yaml::to_string(&redact(&value)).context("Failed to render config as YAML")
}

/// Write a config file holding every default. Refuses to overwrite unless `force` is set.
pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    let config = apply_all_defaults(OcrBotConfig::default());
    write_config(&config, path).await
}

/// Short human form of an OCR timeout for status output.
pub fn describe_timeout(timeout: Duration) -> String {
    format!("{}s", timeout.as_secs())
}
