use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder identity used when the sender has neither a username nor a name.
pub const UNKNOWN_USER: &str = "unknown_user";

/// Whatever the platform tells us about who sent a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// File-name-safe label for a sender, used to prefix archive records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderIdentity(String);

impl SenderIdentity {
    /// Resolve the identity with precedence: username, then `first_last`,
    /// then [`UNKNOWN_USER`]. Whitespace and path separators become `_`.
    pub fn resolve(profile: &SenderProfile) -> Self {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };

        let raw = non_empty(&profile.username).unwrap_or_else(|| {
            let parts: Vec<String> = [&profile.first_name, &profile.last_name]
                .into_iter()
                .filter_map(non_empty)
                .collect();
            if parts.is_empty() {
                UNKNOWN_USER.to_string()
            } else {
                parts.join("_")
            }
        });

        Self::sanitized(&raw)
    }

    /// Build an identity from an arbitrary label, applying the same sanitizing rules.
    pub fn sanitized(raw: &str) -> Self {
        let cleaned: String = raw
            .chars()
            .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
            .collect();
        Self(cleaned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One resolution of a photo as offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoVariant {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u32>,
}

impl PhotoVariant {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A photo message waiting to be processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingPhoto {
    pub id: Uuid,
    pub chat_id: i64,
    pub sender: SenderProfile,
    pub variants: Vec<PhotoVariant>,
    pub received_at: DateTime<Utc>,
}

impl IncomingPhoto {
    pub fn new(chat_id: i64, sender: SenderProfile, variants: Vec<PhotoVariant>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            sender,
            variants,
            received_at: Utc::now(),
        }
    }

    /// The highest-resolution variant: largest pixel area, ties broken by file size.
    pub fn largest_variant(&self) -> Option<&PhotoVariant> {
        self.variants
            .iter()
            .max_by_key(|v| (v.area(), v.file_size.unwrap_or(0)))
    }
}

/// A text message to send back to the chat a photo came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: Option<&str>, first: Option<&str>, last: Option<&str>) -> SenderProfile {
        SenderProfile {
            username: username.map(String::from),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
        }
    }

    #[test]
    fn username_wins() {
        let id = SenderIdentity::resolve(&profile(Some("reader42"), Some("Ann"), Some("Lee")));
        assert_eq!(id.as_str(), "reader42");
    }

    #[test]
    fn falls_back_to_first_and_last_name() {
        let id = SenderIdentity::resolve(&profile(None, Some("Иван"), Some("Петров")));
        assert_eq!(id.as_str(), "Иван_Петров");
    }

    #[test]
    fn first_name_alone_has_no_dangling_separator() {
        let id = SenderIdentity::resolve(&profile(Some(""), Some("Иван"), None));
        assert_eq!(id.as_str(), "Иван");
    }

    #[test]
    fn unknown_user_when_nothing_is_known() {
        let id = SenderIdentity::resolve(&profile(None, None, Some("  ")));
        assert_eq!(id.as_str(), UNKNOWN_USER);
    }

    #[test]
    fn whitespace_and_separators_become_underscores() {
        assert_eq!(SenderIdentity::sanitized("a b").as_str(), "a_b");
        let id = SenderIdentity::resolve(&profile(None, Some("Mary Ann"), Some("../x")));
        assert_eq!(id.as_str(), "Mary_Ann_.._x");
    }

    #[test]
    fn picks_highest_resolution_variant() {
        let variant = |id: &str, w, h, size| PhotoVariant {
            file_id: id.into(),
            width: w,
            height: h,
            file_size: size,
        };
        let photo = IncomingPhoto::new(
            1,
            SenderProfile::default(),
            vec![
                variant("small", 90, 60, Some(1_000)),
                variant("large", 1280, 853, Some(90_000)),
                variant("medium", 320, 213, Some(10_000)),
            ],
        );
        assert_eq!(photo.largest_variant().unwrap().file_id, "large");
    }

    #[test]
    fn no_variants_means_no_largest() {
        let photo = IncomingPhoto::new(1, SenderProfile::default(), vec![]);
        assert!(photo.largest_variant().is_none());
    }
}
