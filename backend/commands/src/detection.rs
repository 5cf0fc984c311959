//! Slash command detection: identify /commands in inbound messages.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Detect a slash command at the start of a message.
///
/// Group chats address commands as `/help@bot_name`; when `bot_username` is
/// given, commands addressed to a different bot are ignored. Returns `None`
/// for plain text and unknown commands.
pub fn detect_command(
    text: &str,
    registry: &CommandRegistry,
    bot_username: Option<&str>,
) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    // Find the first whitespace to split alias from args
    let (head, rest) = trimmed.split_once(|c: char| c.is_whitespace())
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));

    let (alias_part, mention) = match head.split_once('@') {
        Some((alias, bot)) => (alias, Some(bot)),
        None => (head, None),
    };

    if let (Some(mention), Some(own)) = (mention, bot_username) {
        if !mention.eq_ignore_ascii_case(own) {
            return None;
        }
    }

    let def = registry.find_by_alias(alias_part)?;

    Some(CommandInvocation {
        key: def.key.clone(),
        mention: mention.map(str::to_owned),
        raw_args: rest.to_string(),
    })
}
