//! The audio queue engine: resolves queries, drives songbird, and reports
//! queue lifecycle changes as [`QueueEvent`]s.

pub mod error;
pub mod source;
mod voice;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, UserId};
use tokio::sync::mpsc;
use tracing::warn;

pub use error::{PlayerError, PlayerResult};
pub use source::{PlaylistInfo, Query, Resolved, Source, TrackInfo, YtDlp};
pub use voice::SongbirdPlayer;

/// The member a play request was made on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
}

/// A voice channel to play into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTarget {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayOptions {
    pub requester: Option<Requester>,
    /// Where notifications for this guild's queue should go from now on
    pub text_channel: Option<ChannelId>,
}

/// Identifies the queue an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueRef {
    pub guild_id: GuildId,
    pub text_channel: Option<ChannelId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    TrackAdded { queue: QueueRef, track: TrackInfo },
    PlaylistAdded { queue: QueueRef, playlist: PlaylistInfo },
    Finished { queue: QueueRef },
    Disconnected { queue: QueueRef },
    Empty { queue: QueueRef },
    Error { queue: QueueRef, error: PlayerError },
}

impl QueueEvent {
    pub fn queue(&self) -> QueueRef {
        match self {
            QueueEvent::TrackAdded { queue, .. }
            | QueueEvent::PlaylistAdded { queue, .. }
            | QueueEvent::Finished { queue }
            | QueueEvent::Disconnected { queue }
            | QueueEvent::Empty { queue }
            | QueueEvent::Error { queue, .. } => *queue,
        }
    }
}

/// Sending half of the queue event stream
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<QueueEvent>,
}

impl EventBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueueEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: QueueEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Dropping queue event, no notifier is listening: {:?}", e.0);
        }
    }
}

/// The play operation other components (the fallback in particular) depend on
#[async_trait]
pub trait QueueEngine: Send + Sync {
    async fn play(
        &self,
        target: VoiceTarget,
        query: String,
        options: PlayOptions,
    ) -> PlayerResult<()>;
}
