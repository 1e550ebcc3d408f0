use tracing::{debug, info};

use crate::fallback::VoiceLookup;
use crate::notifications::embeds;
use crate::player::{PlayOptions, QueueEngine, Requester, VoiceTarget};
use crate::state::SearchContext;
use crate::{CommandResult, Context};

pub async fn play(ctx: Context<'_>, query: String) -> CommandResult {
    let query = query.trim().to_string();
    if query.is_empty() {
        ctx.send(embeds::error_reply(
            "Tell me what to play, for example `play lofi beats`",
        ))
        .await?;
        return Ok(());
    }

    let guild_id = super::guild_id(ctx)?;
    let data = ctx.data();
    info!("Received play command in guild {} with query: {}", guild_id, query);

    let requester = Requester {
        id: ctx.author().id,
        name: ctx.author().display_name().to_string(),
    };

    // The invoker's channel wins over the guild default
    let channel = ctx
        .serenity_context()
        .cache
        .member_channel(guild_id, requester.id)
        .or_else(|| data.memory.default_channel(guild_id));
    let Some(channel_id) = channel else {
        ctx.send(embeds::error_reply(
            "Join a voice channel first, or set a default one with `setchannel`",
        ))
        .await?;
        return Ok(());
    };
    debug!("Playing into channel {} for {}", channel_id, requester.name);

    data.memory.remember_search(
        guild_id,
        SearchContext {
            query: query.clone(),
            requester: requester.clone(),
        },
    );

    ctx.send(embeds::searching(&query)).await?;

    let target = VoiceTarget {
        guild_id,
        channel_id,
    };
    let options = PlayOptions {
        requester: Some(requester),
        text_channel: Some(ctx.channel_id()),
    };

    if let Err(e) = data.player.play(target, query, options).await {
        data.player.report(guild_id, Some(ctx.channel_id()), e);
    }

    Ok(())
}
