//! Image type detection for archived photos.
//!
//! Telegram re-encodes photos as JPEG, but the archive labels files by what
//! the bytes actually are.

use image::ImageFormat;

/// Extension used when the payload is not a recognizable image.
pub const FALLBACK_EXTENSION: &str = "jpg";

/// Detect a file extension from the payload's magic bytes.
pub fn detect_image_extension(payload: &[u8]) -> &'static str {
    match image::guess_format(payload) {
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::Png)  => "png",
        Ok(ImageFormat::Gif)  => "gif",
        Ok(ImageFormat::WebP) => "webp",
        Ok(ImageFormat::Bmp)  => "bmp",
        Ok(ImageFormat::Tiff) => "tiff",
        _                     => FALLBACK_EXTENSION,
    }
}
