use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::RecognitionError;

/// An OCR engine that turns an image file into text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Engine name for logging (e.g., "tesseract").
    fn name(&self) -> &str;

    /// Recognize the text in the image at `image_path`.
    ///
    /// The returned text is trimmed and may be empty when the image holds no text.
    async fn recognize(&self, image_path: &Path) -> Result<String, RecognitionError>;
}

/// Source of photo bytes, keyed by the platform's file id.
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>>;
}
