use serenity::all::{ChannelType, GuildChannel, Mentionable};

use crate::fallback::VoiceLookup;
use crate::notifications::embeds;
use crate::{CommandResult, Context};

pub async fn setchannel(ctx: Context<'_>, channel: Option<GuildChannel>) -> CommandResult {
    let guild_id = super::guild_id(ctx)?;

    let channel_id = match channel {
        Some(channel) if matches!(channel.kind, ChannelType::Voice | ChannelType::Stage) => {
            channel.id
        }
        Some(channel) => {
            ctx.send(embeds::error_reply(format!(
                "{} is not a voice channel",
                channel.name
            )))
            .await?;
            return Ok(());
        }
        None => match ctx
            .serenity_context()
            .cache
            .member_channel(guild_id, ctx.author().id)
        {
            Some(channel_id) => channel_id,
            None => {
                ctx.send(embeds::error_reply(
                    "Mention a voice channel, or join one and run this again",
                ))
                .await?;
                return Ok(());
            }
        },
    };

    ctx.data().memory.set_default_channel(guild_id, channel_id);
    ctx.send(embeds::default_channel_set(channel_id.mention().to_string()))
        .await?;

    Ok(())
}
