//! Gateway events the framework does not handle itself.

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use serenity::{Cache, ChannelId, GuildId, VoiceState};
use tracing::{debug, info, warn};

use crate::{Data, Error};

pub async fn handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::VoiceStateUpdate { new, .. } = event {
        if let Some(guild_id) = new.guild_id {
            watch_for_empty_channel(ctx, guild_id, data).await;
        }
    }
    Ok(())
}

/// Start the leave cooldown if nobody but bots is left in the bot's channel.
async fn watch_for_empty_channel(ctx: &serenity::Context, guild_id: GuildId, data: &Data) {
    let Some(channel_id) = data.player.current_channel(guild_id).await else {
        return;
    };
    if listener_count(&ctx.cache, guild_id, channel_id) != Some(0) {
        return;
    }
    if !data.player.begin_empty_watch(guild_id) {
        return;
    }

    let cooldown = data.config.empty_cooldown;
    let player = Arc::clone(&data.player);
    let cache = Arc::clone(&ctx.cache);
    info!(
        "Voice channel {} in guild {} is empty, leaving in {:?} unless someone joins",
        channel_id, guild_id, cooldown
    );

    tokio::spawn(async move {
        tokio::time::sleep(cooldown).await;
        player.end_empty_watch(guild_id);

        let still_empty = match player.current_channel(guild_id).await {
            Some(channel_id) => listener_count(&cache, guild_id, channel_id) == Some(0),
            None => false,
        };
        if !still_empty {
            debug!("Guild {} has listeners again, staying", guild_id);
            return;
        }

        if let Err(e) = player.leave_empty(guild_id).await {
            warn!("Failed to leave empty channel in guild {}: {}", guild_id, e);
        }
    });
}

/// Non-bot members in `channel_id`, or `None` if the guild isn't cached.
fn listener_count(cache: &Cache, guild_id: GuildId, channel_id: ChannelId) -> Option<usize> {
    let guild = cache.guild(guild_id)?;
    let states = guild
        .voice_states
        .values()
        .map(|state| (state.channel_id, is_bot(cache, state)));
    Some(count_listeners(states, channel_id))
}

fn is_bot(cache: &Cache, state: &VoiceState) -> bool {
    state
        .member
        .as_ref()
        .map(|member| member.user.bot)
        .or_else(|| cache.user(state.user_id).map(|user| user.bot))
        .unwrap_or(false)
}

fn count_listeners(
    states: impl Iterator<Item = (Option<ChannelId>, bool)>,
    channel_id: ChannelId,
) -> usize {
    states
        .filter(|(channel, bot)| *channel == Some(channel_id) && !bot)
        .count()
}
