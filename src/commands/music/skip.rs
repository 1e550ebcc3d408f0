use crate::notifications::embeds;
use crate::{CommandResult, Context};

pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let reply = match ctx.data().player.skip(guild_id).await {
        Ok(track) => embeds::track_action("⏭️ Skipped Track", "Skipped", &track),
        Err(e) => embeds::error_reply(e.to_string()),
    };
    ctx.send(reply).await?;

    Ok(())
}
