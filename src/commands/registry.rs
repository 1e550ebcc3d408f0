//! Validates and indexes the prefix and slash command definitions.

use std::collections::BTreeMap;
use std::fmt;

use serenity::all::CreateCommand;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{Data, Error};

pub type BotCommand = poise::Command<Data, Error>;

/// The invocation surface a definition is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Prefix,
    Slash,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Prefix => write!(f, "prefix"),
            Surface::Slash => write!(f, "slash"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCommand {
    #[error("{surface} command `{identifier}` has no name")]
    MissingName {
        surface: Surface,
        identifier: String,
    },

    #[error("{surface} command `{name}` has no {surface} entry point")]
    MissingAction { surface: Surface, name: String },
}

/// Two disjoint collections of command definitions, keyed by name.
/// Populated once at startup.
#[derive(Default)]
pub struct CommandRegistry {
    prefix: BTreeMap<String, BotCommand>,
    slash: BTreeMap<String, BotCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every valid definition; invalid ones are logged and skipped.
    pub fn load(
        prefix: impl IntoIterator<Item = BotCommand>,
        slash: impl IntoIterator<Item = BotCommand>,
    ) -> Self {
        let mut registry = Self::new();

        for (surface, commands) in [
            (Surface::Prefix, prefix.into_iter().collect::<Vec<_>>()),
            (Surface::Slash, slash.into_iter().collect()),
        ] {
            for command in commands {
                if let Err(e) = registry.register(surface, command) {
                    warn!("Skipping invalid command: {}", e);
                }
            }
        }

        info!(
            "Loaded {} prefix and {} slash commands",
            registry.prefix.len(),
            registry.slash.len()
        );
        registry
    }

    /// Add one definition. A definition with the same name replaces the
    /// earlier one.
    pub fn register(&mut self, surface: Surface, command: BotCommand) -> Result<(), InvalidCommand> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(InvalidCommand::MissingName {
                surface,
                identifier: command.identifying_name.clone(),
            });
        }

        let (has_action, map, key) = match surface {
            Surface::Prefix => (
                command.prefix_action.is_some(),
                &mut self.prefix,
                name.to_lowercase(),
            ),
            Surface::Slash => (command.slash_action.is_some(), &mut self.slash, name),
        };
        if !has_action {
            return Err(InvalidCommand::MissingAction { surface, name: key });
        }

        debug!("Registering {} command `{}`", surface, key);
        if let Some(previous) = map.insert(key.clone(), command) {
            warn!(
                "Duplicate {} command `{}`: `{}` replaced by a later definition",
                surface, key, previous.identifying_name
            );
        }
        Ok(())
    }

    pub fn prefix_command(&self, name: &str) -> Option<&BotCommand> {
        self.prefix.get(&name.to_lowercase())
    }

    pub fn slash_command(&self, name: &str) -> Option<&BotCommand> {
        self.slash.get(name)
    }

    pub fn prefix_count(&self) -> usize {
        self.prefix.len()
    }

    pub fn slash_count(&self) -> usize {
        self.slash.len()
    }

    /// Payload for the bulk overwrite of the application's slash commands
    pub fn slash_definitions(&self) -> Vec<CreateCommand> {
        self.slash
            .values()
            .filter_map(|command| command.create_as_slash_command())
            .collect()
    }

    /// The command list handed to the framework. A prefix and a slash
    /// definition sharing a name become one command so lookup by name
    /// stays unambiguous.
    pub fn into_framework_commands(self) -> Vec<BotCommand> {
        let Self {
            mut prefix,
            slash,
        } = self;

        let mut commands = Vec::with_capacity(prefix.len() + slash.len());
        for (name, mut command) in slash {
            if let Some(text) = prefix.remove(&name.to_lowercase()) {
                command.prefix_action = text.prefix_action;
                command.aliases = text.aliases;
            }
            commands.push(command);
        }
        commands.extend(prefix.into_values());
        commands
    }
}
