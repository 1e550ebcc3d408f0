//! Per-guild context remembered between commands.

use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId};
use tracing::debug;

use crate::player::Requester;

/// The last play request made in a guild
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    pub query: String,
    pub requester: Requester,
}

/// In-memory, per-guild state; lost on restart.
#[derive(Debug, Default)]
pub struct GuildMemory {
    default_voice_channels: DashMap<GuildId, ChannelId>,
    last_searches: DashMap<GuildId, SearchContext>,
}

impl GuildMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_channel(&self, guild_id: GuildId, channel_id: ChannelId) {
        debug!("Default voice channel for guild {} is now {}", guild_id, channel_id);
        self.default_voice_channels.insert(guild_id, channel_id);
    }

    pub fn default_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.default_voice_channels.get(&guild_id).map(|c| *c)
    }

    pub fn remember_search(&self, guild_id: GuildId, context: SearchContext) {
        self.last_searches.insert(guild_id, context);
    }

    pub fn last_search(&self, guild_id: GuildId) -> Option<SearchContext> {
        self.last_searches.get(&guild_id).map(|c| c.clone())
    }
}
