use poise::CreateReply;
use serenity::all::{CreateEmbed, Timestamp};

use crate::player::{PlayerError, PlaylistInfo, QueueEvent, Requester, Source, TrackInfo};

const UNKNOWN_REQUESTER: &str = "Unknown";

fn requester_name(requester: Option<&Requester>) -> &str {
    requester.map_or(UNKNOWN_REQUESTER, |r| r.name.as_str())
}

fn stamped(title: &str, color: u32) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .color(color)
        .timestamp(Timestamp::now())
}

/// The message announcing a queue event
pub fn for_event(event: &QueueEvent) -> CreateEmbed {
    match event {
        QueueEvent::TrackAdded { track, .. } => track_added(track),
        QueueEvent::PlaylistAdded { playlist, .. } => playlist_added(playlist),
        QueueEvent::Finished { .. } => finished(),
        QueueEvent::Disconnected { .. } => disconnected(),
        QueueEvent::Empty { .. } => channel_empty(),
        QueueEvent::Error { error, .. } => playback_error(error),
    }
}

pub fn track_added(track: &TrackInfo) -> CreateEmbed {
    let mut embed = stamped("➕ Track added", 0x00bfff)
        .description(format!("[{}]({})", track.title, track.url))
        .field("⏱ Duration", track.formatted_duration(), true)
        .field(
            "👤 Requested by",
            requester_name(track.requester.as_ref()),
            true,
        );

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

pub fn playlist_added(playlist: &PlaylistInfo) -> CreateEmbed {
    let mut embed = stamped("📃 Playlist added", 0x9b59b6)
        .description(format!("[{}]({})", playlist.name, playlist.url))
        .field("🎶 Tracks", playlist.tracks.len().to_string(), true)
        .field(
            "👤 Requested by",
            requester_name(playlist.requester.as_ref()),
            true,
        );

    if let Some(thumbnail) = playlist.tracks.first().and_then(|t| t.thumbnail.as_ref()) {
        embed = embed.thumbnail(thumbnail);
    }
    embed
}

pub fn finished() -> CreateEmbed {
    stamped("✅ Playback finished", 0x2ecc71)
        .description("The queue has ended. Thanks for listening!")
}

pub fn disconnected() -> CreateEmbed {
    stamped("📤 Disconnected", 0xe67e22).description("I was disconnected from the voice channel.")
}

pub fn channel_empty() -> CreateEmbed {
    stamped("📭 Channel empty", 0xf39c12)
        .description("The voice channel is empty, so I'm leaving.")
}

pub fn playback_error(error: &PlayerError) -> CreateEmbed {
    stamped("❌ Playback error", 0xff0000).description(format!("**{}**", error))
}

pub fn fallback_started() -> CreateEmbed {
    stamped(
        &format!("⚠️ {} rate limit reached", Source::PRIMARY),
        0xffcc00,
    )
    .description(format!("Trying {} instead...", Source::FALLBACK))
}

pub fn fallback_failed(error: &PlayerError) -> CreateEmbed {
    stamped("❌ Fallback failed", 0xff0000).description(format!(
        "Could not play from {}: {}",
        Source::FALLBACK,
        error
    ))
}

pub fn no_fallback_target() -> CreateEmbed {
    stamped("⚠️ No voice channel available", 0xff9900)
        .description("No voice channel was found to retry the request in.")
}

/// Replies used directly by commands
pub fn searching(query: &str) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔎 Searching")
            .description(format!("`{}`", query))
            .color(0x00bfff),
    )
}

pub fn error_reply(message: impl Into<String>) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(message)
                .color(0xff0000),
        )
        .ephemeral(true)
}

pub fn track_action(title: &str, verb: &str, track: &TrackInfo) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(title)
            .description(format!("{} [{}]({})", verb, track.title, track.url))
            .color(0x00ff00),
    )
}

pub fn stopped() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏹️ Stopped")
            .description("Playback stopped, queue cleared and voice channel left")
            .color(0x00ff00),
    )
}

pub fn default_channel_set(channel_mention: String) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("📌 Default voice channel")
            .description(format!("I'll use {} when nobody is in voice", channel_mention))
            .color(0x00ff00),
    )
}

/// Create an embed for the music queue
pub fn music_queue(tracks: &[TrackInfo]) -> CreateReply {
    let mut description = String::new();

    match tracks.split_first() {
        None => description.push_str("**📭 Queue is empty**"),
        Some((current, upcoming)) => {
            description.push_str("**🎵 Now Playing**\n");
            description.push_str(&format!(
                "[{}]({}) `{}` • {}\n\n",
                current.title,
                current.url,
                current.formatted_duration(),
                requester_name(current.requester.as_ref())
            ));

            if upcoming.is_empty() {
                description.push_str("Nothing queued after this track");
            } else {
                description.push_str(&format!("**📋 Up next - {} tracks**\n", upcoming.len()));
                for (index, track) in upcoming.iter().take(10).enumerate() {
                    description.push_str(&format!(
                        "{}. [{}]({}) `{}`\n",
                        index + 1,
                        track.title,
                        track.url,
                        track.formatted_duration()
                    ));
                }
                if upcoming.len() > 10 {
                    description.push_str(&format!("...and {} more", upcoming.len() - 10));
                }
            }
        }
    }

    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Music Queue")
            .description(description)
            .color(0x00ff00),
    )
}
