//! Slash command registry: the three informational commands of the bot.
use crate::types::CommandDef;

/// Build the built-in command registry, in menu order.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        CommandDef::new("start", "Запустить бота"),
        CommandDef::new("help", "Показать помощь"),
        CommandDef::new("ocr", "Как использовать OCR"),
    ]
}

/// Lookup table over command definitions.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    /// Find a command by slash-text alias (e.g. "/help").
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        let lower = alias.to_lowercase();
        self.commands.iter().find(|c| {
            c.text_aliases.iter().any(|a| a.to_lowercase() == lower)
        })
    }

    /// `(name, description)` pairs for the platform command menu.
    pub fn menu(&self) -> Vec<(String, String)> {
        self.commands
            .iter()
            .map(|c| (c.key.clone(), c.description.clone()))
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}
