//! This module aggregates the command definitions for the bot.

/// Help output shared by both surfaces.
mod help;
/// Command bodies shared by the prefix and slash definitions.
pub mod music;
/// Text commands (e.g., `!play lofi beats`).
pub mod prefix;
/// Validation and lookup of the loaded definitions.
pub mod registry;
/// Slash commands (e.g., `/play query:lofi beats`).
pub mod slash;

pub use registry::{BotCommand, CommandRegistry, InvalidCommand, Surface};
