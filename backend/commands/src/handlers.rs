//! Built-in command handlers and their reply texts.
use anyhow::Result;
use async_trait::async_trait;

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::types::CommandInvocation;

pub const START_TEXT: &str = "👋 Привет! Отправь мне фото, и я распознаю на нём текст.";

pub const HELP_TEXT: &str = "ℹ️ Это OCR-бот. Он распознаёт текст на изображениях.\n\n\
Как пользоваться:\n\
1. Сделай фото документа или текста.\n\
2. Отправь его сюда.\n\
3. Бот пришлёт распознанный текст.";

pub const OCR_USAGE_TEXT: &str = "📸 Чтобы использовать OCR:\n\
1. Сделайте чёткое фото документа или текста.\n\
2. Отправьте его сюда.\n\
3. Бот распознает текст и отправит вам его копию.";

/// Replies with the same text on every invocation.
pub struct StaticReplyHandler {
    pub text: &'static str,
}

#[async_trait]
impl CommandHandler for StaticReplyHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        Ok(CommandResponse::ok(self.text))
    }
}
