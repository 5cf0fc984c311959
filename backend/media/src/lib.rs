//! On-disk storage for recognized photos.

pub mod archive;
pub mod mime_detect;

pub use archive::{ArchiveRecord, ArchiveWriter, TIMESTAMP_FORMAT};
pub use mime_detect::detect_image_extension;
