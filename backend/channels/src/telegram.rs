use std::sync::Arc;

use crate::ChannelAdapter;
use crate::telegram_commands::bot_commands;
use crate::telegram_media::{photo_variants, sender_profile};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use ocrbot_commands::{CommandContext, CommandDispatcher, CommandRegistry, detect_command};
use ocrbot_core::{IncomingPhoto, OcrBotError, SenderIdentity};
use ocrbot_intake::{IntakeJob, IntakeOutcome, IntakePool, PROCESSING_FAILED};
use ocrbot_logging::{EventLogger, PhotoEvent, redact_sensitive_data};
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

/// Long-polling Telegram runtime: the command menu, a command branch and a photo branch.
pub struct TelegramAdapter {
    bot: Bot,
    pool: Arc<IntakePool>,
    commands: Arc<CommandDispatcher>,
    registry: Arc<CommandRegistry>,
}

/// Shared by every handler invocation.
struct HandlerState {
    pool: Arc<IntakePool>,
    commands: Arc<CommandDispatcher>,
    registry: Arc<CommandRegistry>,
    bot_username: Option<String>,
}

impl TelegramAdapter {
    pub fn new(
        bot: Bot,
        pool: Arc<IntakePool>,
        commands: Arc<CommandDispatcher>,
        registry: Arc<CommandRegistry>,
    ) -> Self {
        Self { bot, pool, commands, registry }
    }

    /// Publish the command menu via `setMyCommands`.
    pub async fn register_commands(&self) -> Result<(), OcrBotError> {
        let menu = bot_commands(&self.registry);
        let count = menu.len();
        self.bot
            .set_my_commands(menu)
            .await
            .map_err(|e| OcrBotError::Telegram(redact_sensitive_data(&e.to_string())))?;
        info!(count, "Registered Telegram command menu");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str { "telegram" }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");

        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| OcrBotError::Telegram(redact_sensitive_data(&e.to_string())))
            .context("Bot token was rejected by Telegram")?;
        let bot_username = me.user.username.clone();
        info!(username = ?bot_username, "Authorized as bot");

        self.register_commands().await?;

        let state = Arc::new(HandlerState {
            pool: Arc::clone(&self.pool),
            commands: Arc::clone(&self.commands),
            registry: Arc::clone(&self.registry),
            bot_username,
        });

        let handler = Update::filter_message()
            .branch(dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(on_photo))
            .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(on_text));

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![state])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}

async fn on_text(bot: Bot, msg: Message, state: Arc<HandlerState>) -> ResponseResult<()> {
    if let Err(e) = handle_command(&bot, &msg, &state).await {
        error!(
            chat_id = msg.chat.id.0,
            error = %redact_sensitive_data(&format!("{e:#}")),
            "Command handling failed"
        );
    }
    respond(())
}

async fn handle_command(bot: &Bot, msg: &Message, state: &HandlerState) -> anyhow::Result<()> {
    let Some(text) = msg.text() else { return Ok(()) };
    let Some(inv) = detect_command(text, &state.registry, state.bot_username.as_deref()) else {
        return Ok(());
    };

    let ctx = CommandContext {
        chat_id: msg.chat.id.0,
        sender: SenderIdentity::resolve(&sender_profile(msg.from.as_ref())).to_string(),
    };
    if let Some(response) = state.commands.dispatch(&ctx, &inv).await? {
        bot.send_message(msg.chat.id, response.text)
            .await
            .context("sendMessage failed")?;
    }
    Ok(())
}

/// Hand the photo to the intake pool and forward its replies from a separate task.
async fn on_photo(bot: Bot, msg: Message, state: Arc<HandlerState>) -> ResponseResult<()> {
    let Some(sizes) = msg.photo() else { return respond(()) };

    let photo = IncomingPhoto::new(
        msg.chat.id.0,
        sender_profile(msg.from.as_ref()),
        photo_variants(sizes),
    );
    let photo_id = photo.id.to_string();
    let identity = SenderIdentity::resolve(&photo.sender).to_string();
    let file_id = photo
        .largest_variant()
        .map(|v| v.file_id.clone())
        .unwrap_or_default();
    EventLogger::log_event(photo.chat_id, &photo_id, PhotoEvent::Received { identity, file_id });

    debug!(photo_id = %photo_id, free_slots = state.pool.available(), "Submitting photo");
    let job = state.pool.submit(photo);
    tokio::spawn(deliver(bot, msg.chat.id, photo_id, job));
    respond(())
}

/// Send the job's replies in order, then log how the photo ended.
async fn deliver(bot: Bot, chat_id: ChatId, photo_id: String, mut job: IntakeJob) {
    while let Some(reply) = job.replies.recv().await {
        if let Err(e) = bot.send_message(chat_id, reply.text).await {
            warn!(
                chat_id = chat_id.0,
                error = %redact_sensitive_data(&e.to_string()),
                "Failed to deliver reply"
            );
        }
    }

    let result = match job.handle.await {
        Ok(result) => result,
        Err(join_error) => Err(anyhow!(join_error).context("intake task aborted")),
    };

    let event = match result {
        Ok(IntakeOutcome::Recognized { record, messages }) => PhotoEvent::Archived {
            photo_path: record.photo_path.display().to_string(),
            messages,
        },
        Ok(IntakeOutcome::NoText) => PhotoEvent::NoText,
        Ok(IntakeOutcome::Failed { reason }) => PhotoEvent::Failed { error_msg: reason },
        Err(e) => {
            let error_msg = redact_sensitive_data(&format!("{e:#}"));
            error!(chat_id = chat_id.0, photo_id = %photo_id, error = %error_msg, "Photo processing failed");
            if let Err(send_err) = bot.send_message(chat_id, PROCESSING_FAILED).await {
                warn!(
                    chat_id = chat_id.0,
                    error = %redact_sensitive_data(&send_err.to_string()),
                    "Failed to deliver failure notice"
                );
            }
            PhotoEvent::Failed { error_msg }
        }
    };
    EventLogger::log_event(chat_id.0, &photo_id, event);
}
