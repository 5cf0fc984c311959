//! Optical Character Recognition (OCR)
//!
//! Bridges the local Tesseract executable to extract text from photos sent
//! to the bot. Images are decoded first so corrupt uploads are reported as
//! decode failures instead of opaque engine errors.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use image::ImageReader;
use ocrbot_core::{RecognitionError, Recognizer};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Settings for the Tesseract engine.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Executable name or absolute path.
    pub binary: PathBuf,
    /// Tesseract language packs, joined with `+` on the command line.
    pub languages: Vec<String>,
    pub timeout: Duration,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            languages: vec!["eng".to_string(), "rus".to_string()],
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct TesseractRecognizer {
    config: TesseractConfig,
}

impl TesseractRecognizer {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    /// The `-l` argument, e.g. `eng+rus`.
    pub fn language_arg(&self) -> String {
        self.config.languages.join("+")
    }

    /// First line of `tesseract --version`.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.config.binary)
            .arg("--version")
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.config.binary.display()))?;
        if !output.status.success() {
            bail!("tesseract --version exited with {}", output.status);
        }
        // Older releases print the version banner on stderr.
        let text = if output.stdout.is_empty() { &output.stderr } else { &output.stdout };
        Ok(String::from_utf8_lossy(text).lines().next().unwrap_or_default().trim().to_string())
    }

    /// Language packs reported by `tesseract --list-langs`.
    pub async fn installed_languages(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.config.binary)
            .arg("--list-langs")
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.config.binary.display()))?;
        if !output.status.success() {
            bail!("tesseract --list-langs exited with {}", output.status);
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Configured languages that are not installed.
    pub async fn missing_languages(&self) -> Result<Vec<String>> {
        let installed = self.installed_languages().await?;
        Ok(self
            .config
            .languages
            .iter()
            .filter(|lang| !installed.contains(lang))
            .cloned()
            .collect())
    }

    async fn run_engine(&self, image_path: &Path) -> Result<String, RecognitionError> {
        let lang = self.language_arg();
        debug!(path = %image_path.display(), lang = %lang, "Invoking tesseract");

        let child = Command::new(&self.config.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &lang])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RecognitionError::Engine(format!(
                    "cannot start {}: {e}",
                    self.config.binary.display()
                ))
            })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| RecognitionError::Timeout(self.config.timeout.as_secs()))?
            .map_err(|e| RecognitionError::Engine(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, RecognitionError> {
        let (width, height) = decode_dimensions(image_path).await?;
        info!(path = %image_path.display(), width, height, "Running OCR on image");

        let text = self.run_engine(image_path).await?;
        info!(chars = text.chars().count(), "OCR finished");
        Ok(text)
    }
}

/// Decode the image fully (on the blocking pool) and return its dimensions.
async fn decode_dimensions(path: &Path) -> Result<(u32, u32), RecognitionError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        warn!(path = %path.display(), error = %source, "Cannot read image for OCR");
        RecognitionError::Io {
            path: path.display().to_string(),
            source,
        }
    })?;

    tokio::task::spawn_blocking(move || {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RecognitionError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| RecognitionError::Decode(e.to_string()))?;
        Ok((image.width(), image.height()))
    })
    .await
    .map_err(|e| RecognitionError::Decode(format!("decode task failed: {e}")))?
}

/// Parse `--list-langs` output: a header line followed by one language per line.
fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_owned)
        .collect()
}
