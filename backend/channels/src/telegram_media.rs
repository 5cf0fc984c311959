//! Telegram Media Handler
//!
//! Converts Telegram photo messages into intake types and downloads photo bytes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ocrbot_core::{PhotoFetcher, PhotoVariant, SenderProfile};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{PhotoSize, User};
use tracing::debug;

/// Downloads photo variants through the Bot API (`getFile` + file download).
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl PhotoFetcher for TelegramFetcher {
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(file_id.to_owned())
            .await
            .context("getFile request failed")?;

        let mut payload = Vec::new();
        self.bot
            .download_file(&file.path, &mut payload)
            .await
            .context("photo download failed")?;

        debug!(file_id, bytes = payload.len(), "Downloaded Telegram photo");
        Ok(payload)
    }
}

/// Sender profile from the message author, empty for channel posts.
pub fn sender_profile(user: Option<&User>) -> SenderProfile {
    let Some(user) = user else {
        return SenderProfile::default();
    };
    SenderProfile {
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
        last_name: user.last_name.clone(),
    }
}

/// Resolution variants of a photo. Sizes Telegram did not report are dropped.
pub fn photo_variants(sizes: &[PhotoSize]) -> Vec<PhotoVariant> {
    sizes
        .iter()
        .map(|size| PhotoVariant {
            file_id: size.file.id.to_string(),
            width: size.width,
            height: size.height,
            file_size: Some(size.file.size).filter(|bytes| *bytes > 0 && *bytes != u32::MAX),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrbot_core::{IncomingPhoto, SenderIdentity};
    use serde_json::json;

    fn user(value: serde_json::Value) -> User {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn profile_without_username_resolves_to_names() {
        let user = user(json!({
            "id": 1,
            "is_bot": false,
            "first_name": "Иван",
            "last_name": "Петров"
        }));
        let profile = sender_profile(Some(&user));
        assert_eq!(profile.username, None);
        assert_eq!(SenderIdentity::resolve(&profile).as_str(), "Иван_Петров");
    }

    #[test]
    fn missing_author_is_unknown_user() {
        let profile = sender_profile(None);
        assert_eq!(SenderIdentity::resolve(&profile).as_str(), "unknown_user");
    }

    #[test]
    fn variants_keep_ids_and_pick_largest() {
        let sizes: Vec<PhotoSize> = serde_json::from_value(json!([
            { "file_id": "small", "file_unique_id": "u1", "width": 90, "height": 60, "file_size": 1200 },
            { "file_id": "large", "file_unique_id": "u3", "width": 1280, "height": 853 },
            { "file_id": "medium", "file_unique_id": "u2", "width": 320, "height": 213, "file_size": 14000 }
        ]))
        .unwrap();

        let variants = photo_variants(&sizes);
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].file_size, Some(1200));
        assert_eq!(variants[1].file_size, None);

        let photo = IncomingPhoto::new(7, SenderProfile::default(), variants);
        assert_eq!(photo.largest_variant().unwrap().file_id, "large");
    }
}
