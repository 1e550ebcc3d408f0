//! Slash command definitions, published with one bulk overwrite at startup.

use serenity::all::GuildChannel;

use super::{help as shared_help, music};
use crate::{CommandResult, Context, Data, Error};

/// Every slash command definition, in load order
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        play(),
        skip(),
        stop(),
        pause(),
        resume(),
        queue(),
        setchannel(),
        help(),
    ]
}

/// Play a track or playlist from a URL or a search
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    music::play(ctx, query).await
}

/// Skip the current track
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    music::skip(ctx).await
}

/// Stop playback, clear the queue and leave
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    music::stop(ctx).await
}

/// Pause the current track
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    music::pause(ctx).await
}

/// Resume the paused track
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    music::resume(ctx).await
}

/// Show the current track and what's queued after it
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    music::queue(ctx).await
}

/// Set the voice channel used when the requester isn't in one
#[poise::command(slash_command, guild_only, category = "Music")]
pub async fn setchannel(
    ctx: Context<'_>,
    #[description = "Voice channel to default to (defaults to yours)"]
    #[channel_types("Voice", "Stage")]
    channel: Option<GuildChannel>,
) -> CommandResult {
    music::setchannel(ctx, channel).await
}

/// Show the available commands
#[poise::command(slash_command, category = "General")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    shared_help::help(ctx, command).await
}
