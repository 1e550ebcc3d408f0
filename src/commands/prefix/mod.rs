//! Text commands, invoked as `<prefix><name> <arguments>`.

use serenity::all::GuildChannel;

use super::{help as shared_help, music};
use crate::{CommandResult, Context, Data, Error};

/// Every prefix command definition, in load order
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
#[poise::command(prefix_command, guild_only, category = "Music", aliases("p"))]
pub async fn play(ctx: Context<'_>, #[rest] query: String) -> CommandResult {
    music::play(ctx, query).await
}

/// Skip the current track
#[poise::command(prefix_command, guild_only, category = "Music", aliases("s"))]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    music::skip(ctx).await
}

/// Stop playback, clear the queue and leave
#[poise::command(prefix_command, guild_only, category = "Music", aliases("leave"))]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    music::stop(ctx).await
}

/// Pause the current track
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    music::pause(ctx).await
}

/// Resume the paused track
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    music::resume(ctx).await
}

/// Show the current track and what's queued after it
#[poise::command(prefix_command, guild_only, category = "Music", aliases("q"))]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    music::queue(ctx).await
}

/// Set the voice channel used when the requester isn't in one
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn setchannel(ctx: Context<'_>, channel: Option<GuildChannel>) -> CommandResult {
    music::setchannel(ctx, channel).await
}

/// Show the available commands
#[poise::command(prefix_command, category = "General")]
pub async fn help(ctx: Context<'_>, command: Option<String>) -> CommandResult {
    shared_help::help(ctx, command).await
}
