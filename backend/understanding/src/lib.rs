pub mod ocr;

pub use ocr::{TesseractConfig, TesseractRecognizer};
