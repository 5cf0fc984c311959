use async_trait::async_trait;

pub mod telegram;
pub mod telegram_commands;
pub mod telegram_media;

pub use telegram::TelegramAdapter;
pub use telegram_commands::bot_commands;
pub use telegram_media::{TelegramFetcher, photo_variants, sender_profile};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's event loop until shutdown.
    async fn start(&self) -> anyhow::Result<()>;
}
