use crate::notifications::embeds;
use crate::{CommandResult, Context};

pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let reply = match ctx.data().player.pause(guild_id).await {
        Ok(track) => embeds::track_action("⏸️ Paused", "Paused", &track),
        Err(e) => embeds::error_reply(e.to_string()),
    };
    ctx.send(reply).await?;

    Ok(())
}

pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let reply = match ctx.data().player.resume(guild_id).await {
        Ok(track) => embeds::track_action("▶️ Resumed", "Resumed", &track),
        Err(e) => embeds::error_reply(e.to_string()),
    };
    ctx.send(reply).await?;

    Ok(())
}
