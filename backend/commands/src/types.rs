//! Slash command types.

/// A command entry in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDef {
    /// Unique key, also the name shown in the platform's command menu (e.g. "start").
    pub key: String,
    /// Menu description.
    pub description: String,
    /// Slash aliases (must start with '/').
    pub text_aliases: Vec<String>,
}

impl CommandDef {
    pub fn new(key: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
            text_aliases: vec![format!("/{key}")],
        }
    }
}

/// A detected slash-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub key: String,
    /// Bot name after `@`, as in `/help@some_bot`.
    pub mention: Option<String>,
    /// Text after the command. The built-in commands ignore it.
    pub raw_args: String,
}
