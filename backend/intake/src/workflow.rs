//! The photo intake workflow.
//!
//! Received -> Downloaded -> Recognized -> Archived -> Replied -> Done.
//! A recognition failure skips archival and is reported to the user with its
//! own notice; download and archive failures abort the workflow and propagate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ocrbot_core::{IncomingPhoto, OcrBotError, PhotoFetcher, Recognizer, Reply, SenderIdentity};
use ocrbot_media::{ArchiveRecord, ArchiveWriter};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::messages::{
    recognition_failed, split_message, ACK_TEXT, NO_TEXT_FOUND, RESULT_HEADER,
    TELEGRAM_MESSAGE_LIMIT,
};

/// How one photo ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Text was found, archived, and sent back in `messages` text messages.
    Recognized { record: ArchiveRecord, messages: usize },
    /// The engine ran but found no text.
    NoText,
    /// The engine could not run on this photo.
    Failed { reason: String },
}

pub struct PhotoIntake {
    fetcher: Arc<dyn PhotoFetcher>,
    recognizer: Arc<dyn Recognizer>,
    archive: Arc<ArchiveWriter>,
    temp_dir: Option<PathBuf>,
    message_limit: usize,
}

impl PhotoIntake {
    pub fn new(
        fetcher: Arc<dyn PhotoFetcher>,
        recognizer: Arc<dyn Recognizer>,
        archive: Arc<ArchiveWriter>,
    ) -> Self {
        Self {
            fetcher,
            recognizer,
            archive,
            temp_dir: None,
            message_limit: TELEGRAM_MESSAGE_LIMIT,
        }
    }

    /// Place downloads in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    /// Run one photo through the workflow, sending every reply on `replies`.
    pub async fn process(
        &self,
        photo: &IncomingPhoto,
        replies: &mpsc::Sender<Reply>,
    ) -> Result<IntakeOutcome> {
        self.acknowledge(replies).await?;
        self.process_received(photo, replies).await
    }

    /// Tell the user the photo arrived.
    pub async fn acknowledge(&self, replies: &mpsc::Sender<Reply>) -> Result<()> {
        send(replies, ACK_TEXT).await
    }

    /// Everything after the acknowledgement: download, recognize, archive, reply.
    #[instrument(skip_all, fields(photo_id = %photo.id, chat_id = photo.chat_id))]
    pub async fn process_received(
        &self,
        photo: &IncomingPhoto,
        replies: &mpsc::Sender<Reply>,
    ) -> Result<IntakeOutcome> {
        let variant = photo
            .largest_variant()
            .ok_or_else(|| OcrBotError::Download("photo message carries no variants".into()))?;
        debug!(
            file_id = %variant.file_id,
            width = variant.width,
            height = variant.height,
            "Selected photo variant"
        );

        let payload = self
            .fetcher
            .fetch(&variant.file_id)
            .await
            .with_context(|| format!("Failed to download photo {}", variant.file_id))?;
        info!(bytes = payload.len(), "Downloaded photo");

        // Dropping the temp file on any early return removes it from disk.
        let download = self.create_temp_file()?;
        tokio::fs::write(download.path(), &payload)
            .await
            .with_context(|| format!("Failed to write {}", download.path().display()))?;

        let recognized = self.recognizer.recognize(download.path()).await;

        let temp_path = download.path().to_path_buf();
        if let Err(e) = download.close() {
            warn!(path = %temp_path.display(), error = %e, "Failed to delete temp download");
        }

        let text = match recognized {
            Ok(text) => text,
            Err(e) => {
                warn!(engine = self.recognizer.name(), error = %e, "Recognition failed");
                let reason = e.to_string();
                send(replies, &recognition_failed(&reason)).await?;
                return Ok(IntakeOutcome::Failed { reason });
            }
        };

        if text.is_empty() {
            info!("No text found on photo");
            send(replies, NO_TEXT_FOUND).await?;
            return Ok(IntakeOutcome::NoText);
        }

        let identity = SenderIdentity::resolve(&photo.sender);
        let record = self
            .archive
            .archive(&identity, &payload, &text)
            .await
            .context("Failed to archive OCR result")?;

        send(replies, RESULT_HEADER).await?;
        let chunks = split_message(&text, self.message_limit);
        for chunk in &chunks {
            send(replies, chunk).await?;
        }
        info!(identity = %identity, chars = text.chars().count(), messages = chunks.len(), "Replied with recognized text");

        Ok(IntakeOutcome::Recognized { record, messages: chunks.len() })
    }

    fn create_temp_file(&self) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ocrbot-").suffix(".jpg");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        file.context("Failed to create temp file for photo download")
    }
}

async fn send(replies: &mpsc::Sender<Reply>, text: &str) -> Result<()> {
    replies
        .send(Reply::text(text))
        .await
        .map_err(|_| anyhow::anyhow!("reply channel closed"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use ocrbot_core::{PhotoVariant, RecognitionError, SenderProfile};
    use std::path::Path;
    use std::sync::Mutex;

    pub(crate) struct FakeFetcher {
        pub payload: Option<Vec<u8>>,
        pub requested: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn serving(payload: &[u8]) -> Self {
            Self { payload: Some(payload.to_vec()), requested: Mutex::new(vec![]) }
        }

        pub fn failing() -> Self {
            Self { payload: None, requested: Mutex::new(vec![]) }
        }
    }

    #[async_trait]
    impl PhotoFetcher for FakeFetcher {
        async fn fetch(&self, file_id: &str) -> Result<Vec<u8>> {
            self.requested.lock().unwrap().push(file_id.to_string());
            self.payload.clone().ok_or_else(|| anyhow::anyhow!("network unreachable"))
        }
    }

    pub(crate) enum Script {
        Text(&'static str),
        Error(&'static str),
    }

    pub(crate) struct FakeRecognizer {
        pub script: Script,
        pub seen: Mutex<Vec<PathBuf>>,
    }

    impl FakeRecognizer {
        pub fn returning(script: Script) -> Self {
            Self { script, seen: Mutex::new(vec![]) }
        }

        pub fn seen_path(&self) -> PathBuf {
            self.seen.lock().unwrap()[0].clone()
        }
    }

    #[async_trait]
    impl Recognizer for FakeRecognizer {
        fn name(&self) -> &str {
            "fake"
        }

        async fn recognize(&self, image_path: &Path) -> Result<String, RecognitionError> {
            assert!(image_path.exists(), "temp file must exist during recognition");
            assert_eq!(image_path.extension().unwrap(), "jpg");
            self.seen.lock().unwrap().push(image_path.to_path_buf());
            match self.script {
                Script::Text(text) => Ok(text.to_string()),
                Script::Error(reason) => Err(RecognitionError::Engine(reason.to_string())),
            }
        }
    }

    pub(crate) fn photo() -> IncomingPhoto {
        let variant = |id: &str, w, h| PhotoVariant {
            file_id: id.into(),
            width: w,
            height: h,
            file_size: None,
        };
        IncomingPhoto::new(
            7,
            SenderProfile {
                username: None,
                first_name: Some("Иван".into()),
                last_name: Some("Петров".into()),
            },
            vec![variant("thumb", 90, 90), variant("full", 1280, 1280), variant("mid", 320, 320)],
        )
    }

    struct Harness {
        _root: tempfile::TempDir,
        scratch: PathBuf,
        archive_dir: PathBuf,
    }

    impl Harness {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let scratch = root.path().join("scratch");
            std::fs::create_dir(&scratch).unwrap();
            let archive_dir = root.path().join("ocr_results");
            Self { scratch, archive_dir, _root: root }
        }

        fn intake(&self, fetcher: Arc<dyn PhotoFetcher>, recognizer: Arc<dyn Recognizer>) -> PhotoIntake {
            PhotoIntake::new(fetcher, recognizer, Arc::new(ArchiveWriter::new(&self.archive_dir)))
                .with_temp_dir(&self.scratch)
        }

        fn archived(&self) -> Vec<String> {
            let Ok(entries) = std::fs::read_dir(&self.archive_dir) else { return vec![] };
            let mut names: Vec<String> = entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        fn scratch_is_empty(&self) -> bool {
            std::fs::read_dir(&self.scratch).unwrap().next().is_none()
        }
    }

    async fn run(intake: &PhotoIntake) -> (Result<IntakeOutcome>, Vec<String>) {
        let (tx, mut rx) = mpsc::channel(32);
        let outcome = intake.process(&photo(), &tx).await;
        drop(tx);
        let mut texts = vec![];
        while let Some(reply) = rx.recv().await {
            texts.push(reply.text);
        }
        (outcome, texts)
    }

    #[tokio::test]
    async fn recognized_text_is_archived_and_sent_back() {
        let h = Harness::new();
        let fetcher = Arc::new(FakeFetcher::serving(b"jpeg bytes"));
        let recognizer = Arc::new(FakeRecognizer::returning(Script::Text("The quick brown fox")));
        let intake = h.intake(fetcher.clone(), recognizer.clone());

        let (outcome, texts) = run(&intake).await;

        assert_eq!(texts, vec![ACK_TEXT, RESULT_HEADER, "The quick brown fox"]);
        let Ok(IntakeOutcome::Recognized { record, messages }) = outcome else {
            panic!("expected a recognized outcome");
        };
        assert_eq!(messages, 1);
        assert_eq!(std::fs::read(&record.photo_path).unwrap(), b"jpeg bytes");
        assert_eq!(std::fs::read_to_string(&record.text_path).unwrap(), "The quick brown fox");

        let archived = h.archived();
        assert_eq!(archived.len(), 2);
        assert!(archived.iter().all(|name| name.starts_with("Иван_Петров_")));

        assert_eq!(*fetcher.requested.lock().unwrap(), vec!["full"]);
        assert!(!recognizer.seen_path().exists());
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn empty_text_replies_not_found_and_archives_nothing() {
        let h = Harness::new();
        let recognizer = Arc::new(FakeRecognizer::returning(Script::Text("")));
        let intake = h.intake(Arc::new(FakeFetcher::serving(b"blank")), recognizer.clone());

        let (outcome, texts) = run(&intake).await;

        assert_eq!(outcome.unwrap(), IntakeOutcome::NoText);
        assert_eq!(texts, vec![ACK_TEXT, NO_TEXT_FOUND]);
        assert!(h.archived().is_empty());
        assert!(!recognizer.seen_path().exists());
    }

    #[tokio::test]
    async fn recognition_error_gets_its_own_notice() {
        let h = Harness::new();
        let recognizer = Arc::new(FakeRecognizer::returning(Script::Error("engine crashed")));
        let intake = h.intake(Arc::new(FakeFetcher::serving(b"bytes")), recognizer.clone());

        let (outcome, texts) = run(&intake).await;

        let reason = "OCR engine failed: engine crashed".to_string();
        assert_eq!(outcome.unwrap(), IntakeOutcome::Failed { reason: reason.clone() });
        assert_eq!(texts, vec![ACK_TEXT.to_string(), recognition_failed(&reason)]);
        assert!(!texts.iter().any(|t| t == RESULT_HEADER));
        assert!(h.archived().is_empty());
        assert!(!recognizer.seen_path().exists());
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn download_failure_propagates() {
        let h = Harness::new();
        let recognizer = Arc::new(FakeRecognizer::returning(Script::Text("unused")));
        let intake = h.intake(Arc::new(FakeFetcher::failing()), recognizer.clone());

        let (outcome, texts) = run(&intake).await;

        let err = outcome.unwrap_err();
        assert!(format!("{err:#}").contains("network unreachable"));
        assert_eq!(texts, vec![ACK_TEXT]);
        assert!(recognizer.seen.lock().unwrap().is_empty());
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn long_text_is_split_across_messages() {
        let h = Harness::new();
        let recognizer = Arc::new(FakeRecognizer::returning(Script::Text("line one\nline two\nline three")));
        let intake = h
            .intake(Arc::new(FakeFetcher::serving(b"bytes")), recognizer)
            .with_message_limit(10);

        let (outcome, texts) = run(&intake).await;

        assert!(matches!(outcome.unwrap(), IntakeOutcome::Recognized { messages: 3, .. }));
        assert_eq!(texts, vec![ACK_TEXT, RESULT_HEADER, "line one", "line two", "line three"]);
    }

    #[tokio::test]
    async fn corrupt_upload_is_reported_by_the_real_adapter() {
        use ocrbot_understanding::{TesseractConfig, TesseractRecognizer};

        let h = Harness::new();
        let recognizer = Arc::new(TesseractRecognizer::new(TesseractConfig::default()));
        let intake = h.intake(Arc::new(FakeFetcher::serving(b"definitely not a jpeg")), recognizer);

        let (outcome, texts) = run(&intake).await;

        assert!(matches!(outcome.unwrap(), IntakeOutcome::Failed { .. }));
        assert_eq!(texts.len(), 2);
        assert!(texts[1].starts_with("⚠️ Ошибка при распознавании: cannot decode image"));
        assert!(h.archived().is_empty());
        assert!(h.scratch_is_empty());
    }

    #[tokio::test]
    async fn blank_image_with_real_adapter_reports_no_text() {
        use ocrbot_understanding::{TesseractConfig, TesseractRecognizer};

        if tokio::process::Command::new("tesseract").arg("--version").output().await.is_err() {
            return;
        }

        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbImage::from_pixel(320, 160, image::Rgb([255, 255, 255]))
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();

        let h = Harness::new();
        let recognizer = Arc::new(TesseractRecognizer::new(TesseractConfig {
            languages: vec!["eng".into()],
            ..Default::default()
        }));
        let intake = h.intake(Arc::new(FakeFetcher::serving(png.get_ref())), recognizer);

        let (outcome, texts) = run(&intake).await;

        assert_eq!(outcome.unwrap(), IntakeOutcome::NoText);
        assert_eq!(texts, vec![ACK_TEXT, NO_TEXT_FOUND]);
        assert!(h.archived().is_empty());
    }
}
