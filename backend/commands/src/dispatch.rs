//! Command dispatch: route detected commands to handler functions.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub chat_id: i64,
    pub sender: String,
}

/// The text reply to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: String,
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    /// Run the handler for `inv`. Commands without a handler produce no reply.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        inv: &CommandInvocation,
    ) -> Result<Option<CommandResponse>> {
        match self.handlers.get(&inv.key) {
            Some(handler) => {
                info!(
                    chat_id = ctx.chat_id,
                    sender = %ctx.sender,
                    mention = ?inv.mention,
                    args = %inv.raw_args,
                    "Dispatching /{}",
                    inv.key
                );
                handler.handle(ctx, inv).await.map(Some)
            }
            None => {
                debug!(chat_id = ctx.chat_id, "No handler registered for /{}", inv.key);
                Ok(None)
            }
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self { Self::new() }
}
