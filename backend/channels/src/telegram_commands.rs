//! Telegram Bot Commands
//!
//! Builds the `setMyCommands` menu from the command registry.

use ocrbot_commands::CommandRegistry;
use teloxide::types::BotCommand;

/// The command menu shown by Telegram clients, in registry order.
pub fn bot_commands(registry: &CommandRegistry) -> Vec<BotCommand> {
    registry
        .menu()
        .into_iter()
        .map(|(command, description)| BotCommand::new(command, description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_builtin_commands() {
        let commands = bot_commands(&CommandRegistry::new());
        let names: Vec<&str> = commands.iter().map(|c| c.command.as_str()).collect();
        assert_eq!(names, vec!["start", "help", "ocr"]);
        assert_eq!(commands[0].description, "Запустить бота");
    }
}
