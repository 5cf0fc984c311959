//! Log Redaction Layer
//!
//! Scrubs Telegram bot tokens from strings prior to logging. teloxide
//! request errors embed the full `api.telegram.org/bot<token>/...` URL.

use regex::Regex;
use std::sync::LazyLock;

static BOT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/bot\d+:[A-Za-z0-9_-]+").unwrap());
static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6,}:[A-Za-z0-9_-]{30,}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_URL_RE.replace_all(input, "/bot[REDACTED_TOKEN]");
    BOT_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
