pub mod error;
pub mod traits;
pub mod types;

pub use error::{OcrBotError, RecognitionError};
pub use traits::{PhotoFetcher, Recognizer};
pub use types::{IncomingPhoto, PhotoVariant, Reply, SenderIdentity, SenderProfile, UNKNOWN_USER};
