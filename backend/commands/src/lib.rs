pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

use std::sync::Arc;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::{StaticReplyHandler, HELP_TEXT, OCR_USAGE_TEXT, START_TEXT};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{CommandDef, CommandInvocation};

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher() -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register("start", Arc::new(StaticReplyHandler { text: START_TEXT }));
    dispatcher.register("help", Arc::new(StaticReplyHandler { text: HELP_TEXT }));
    dispatcher.register("ocr", Arc::new(StaticReplyHandler { text: OCR_USAGE_TEXT }));
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CommandContext {
        CommandContext { chat_id: 42, sender: "reader".into() }
    }

    async fn reply_to(text: &str) -> Option<String> {
        let registry = CommandRegistry::new();
        let dispatcher = build_default_dispatcher();
        let inv = detect_command(text, &registry, None)?;
        dispatcher.dispatch(&ctx(), &inv).await.unwrap().map(|r| r.text)
    }

    #[tokio::test]
    async fn every_registered_command_has_a_reply() {
        let registry = CommandRegistry::new();
        let dispatcher = build_default_dispatcher();
        for (key, _) in registry.menu() {
            let inv = detect_command(&format!("/{key}"), &registry, None).unwrap();
            let reply = dispatcher.dispatch(&ctx(), &inv).await.unwrap();
            assert!(reply.is_some(), "no reply for {key}");
        }
    }

    #[tokio::test]
    async fn static_replies_match_commands() {
        assert_eq!(reply_to("/start").await.as_deref(), Some(START_TEXT));
        assert_eq!(reply_to("/help").await.as_deref(), Some(HELP_TEXT));
        assert_eq!(reply_to("/ocr extra words").await.as_deref(), Some(OCR_USAGE_TEXT));
    }

    #[tokio::test]
    async fn unhandled_key_yields_no_reply() {
        let dispatcher = CommandDispatcher::new();
        let inv = CommandInvocation {
            key: "help".into(),
            mention: None,
            raw_args: String::new(),
        };
        assert!(dispatcher.dispatch(&ctx(), &inv).await.unwrap().is_none());
    }
}
