use crate::notifications::embeds;
use crate::player::PlayerError;
use crate::{CommandResult, Context};

pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let reply = match ctx.data().player.tracks(guild_id).await {
        Ok(tracks) => embeds::music_queue(&tracks),
        Err(PlayerError::NotConnected) => embeds::music_queue(&[]),
        Err(e) => embeds::error_reply(e.to_string()),
    };
    ctx.send(reply).await?;

    Ok(())
}
