//! A Discord music bot: prefix and slash commands feeding a songbird-backed
//! queue, with queue lifecycle events rendered as embeds and a one-shot
//! YouTube fallback when SoundCloud rate-limits a search.

use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod events;
pub mod fallback;
pub mod framework;
pub mod notifications;
pub mod player;
pub mod state;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub player: Arc<player::SongbirdPlayer>,
    pub memory: Arc<state::GuildMemory>,
    pub config: Arc<config::Config>,
}
