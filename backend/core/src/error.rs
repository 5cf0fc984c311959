use thiserror::Error;

/// Top-level error type for the ocrbot runtime.
#[derive(Debug, Error)]
pub enum OcrBotError {
    #[error("photo download failed: {0}")]
    Download(String),

    #[error("archive write failed: {0}")]
    Archive(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("telegram error: {0}")]
    Telegram(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a recognition attempt produced no text.
///
/// Kept separate from an empty result: `Ok(String::new())` means the engine
/// ran and found nothing, any variant here means it could not run at all.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// `path` stays out of the message, which is shown to the user.
    #[error("cannot read image: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image: {0}")]
    Decode(String),

    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("OCR engine timed out after {0}s")]
    Timeout(u64),
}
