//! Retries a rate-limited request once on the secondary source.

use std::sync::Arc;

use serenity::all::{Cache, ChannelId, GuildId, UserId};
use tracing::{info, warn};

use crate::notifications::{Announcer, embeds};
use crate::player::{PlayOptions, PlayerError, QueueEngine, Source, VoiceTarget};
use crate::state::GuildMemory;

/// Where a guild member currently is in voice
pub trait VoiceLookup: Send + Sync {
    fn member_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId>;
}

impl VoiceLookup for Cache {
    fn member_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
        self.guild(guild_id)?
            .voice_states
            .get(&user_id)
            .and_then(|state| state.channel_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    /// The remembered search was queued on the secondary source
    Retried,
    Failed(PlayerError),
    /// No remembered search, or nowhere to play it
    NoTarget,
}

pub struct FallbackCoordinator {
    engine: Arc<dyn QueueEngine>,
    voice: Arc<dyn VoiceLookup>,
    announcer: Arc<dyn Announcer>,
    memory: Arc<GuildMemory>,
}

impl FallbackCoordinator {
    pub fn new(
        engine: Arc<dyn QueueEngine>,
        voice: Arc<dyn VoiceLookup>,
        announcer: Arc<dyn Announcer>,
        memory: Arc<GuildMemory>,
    ) -> Self {
        Self {
            engine,
            voice,
            announcer,
            memory,
        }
    }

    /// Replay the guild's last search against the fallback source, once.
    pub async fn recover(&self, guild_id: GuildId, text_channel: ChannelId) -> FallbackOutcome {
        self.announcer
            .announce(text_channel, embeds::fallback_started())
            .await;

        let Some(context) = self.memory.last_search(guild_id) else {
            warn!("Rate limited in guild {} with no search to retry", guild_id);
            self.announcer
                .announce(text_channel, embeds::no_fallback_target())
                .await;
            return FallbackOutcome::NoTarget;
        };

        let channel = self
            .voice
            .member_channel(guild_id, context.requester.id)
            .or_else(|| self.memory.default_channel(guild_id));
        let Some(channel_id) = channel else {
            warn!(
                "No voice channel for the fallback in guild {} ({} is not in voice, no default set)",
                guild_id, context.requester.name
            );
            self.announcer
                .announce(text_channel, embeds::no_fallback_target())
                .await;
            return FallbackOutcome::NoTarget;
        };

        let query = Source::FALLBACK.search_query(&context.query);
        info!(
            "Falling back to {} in guild {}: {}",
            Source::FALLBACK,
            guild_id,
            query
        );

        let target = VoiceTarget {
            guild_id,
            channel_id,
        };
        let options = PlayOptions {
            requester: Some(context.requester),
            text_channel: Some(text_channel),
        };

        match self.engine.play(target, query, options).await {
            Ok(()) => FallbackOutcome::Retried,
            Err(e) => {
                warn!("Fallback failed in guild {}: {}", guild_id, e);
                self.announcer
                    .announce(text_channel, embeds::fallback_failed(&e))
                    .await;
                FallbackOutcome::Failed(e)
            }
        }
    }
}
