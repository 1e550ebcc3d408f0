use tracing::info;

use crate::notifications::embeds;
use crate::{CommandResult, Context};

pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let reply = match ctx.data().player.leave(guild_id).await {
        Ok(()) => {
            info!("Stopped playback in guild {} at {}'s request", guild_id, ctx.author().name);
            embeds::stopped()
        }
        Err(e) => embeds::error_reply(e.to_string()),
    };
    ctx.send(reply).await?;

    Ok(())
}
