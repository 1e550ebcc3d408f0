use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serenity::all::{ChannelId, GuildId};
use songbird::input::YoutubeDl;
use songbird::tracks::{PlayMode, Track, TrackHandle, TrackQueue};
use songbird::{Call, CoreEvent, Event, EventContext, Songbird, TrackEvent};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::source::{Resolved, TrackInfo, YtDlp};
use super::{
    EventBus, PlayOptions, PlayerError, PlayerResult, Query, QueueEngine, QueueEvent, QueueRef,
    VoiceTarget,
};

/// State shared between the player and the songbird event handlers it installs
struct PlayerState {
    songbird: Arc<Songbird>,
    events: EventBus,
    // Text channel of the latest play request in each guild
    text_channels: DashMap<GuildId, ChannelId>,
    // Guilds the bot is leaving on purpose; their stop/disconnect events stay quiet
    departing: DashSet<GuildId>,
    // Guilds with a pending empty-channel cooldown
    empty_watch: DashSet<GuildId>,
}

impl PlayerState {
    fn queue_ref(&self, guild_id: GuildId) -> QueueRef {
        QueueRef {
            guild_id,
            text_channel: self.text_channels.get(&guild_id).map(|c| *c),
        }
    }
}

/// Queue engine backed by songbird's builtin queue and yt-dlp
pub struct SongbirdPlayer {
    state: Arc<PlayerState>,
    resolver: YtDlp,
    http: reqwest::Client,
}

impl SongbirdPlayer {
    pub fn new(songbird: Arc<Songbird>, resolver: YtDlp, events: EventBus) -> Self {
        Self {
            state: Arc::new(PlayerState {
                songbird,
                events,
                text_channels: DashMap::new(),
                departing: DashSet::new(),
                empty_watch: DashSet::new(),
            }),
            resolver,
            http: reqwest::Client::new(),
        }
    }

    /// Surface a failed play request on the event stream so it is announced
    /// (and, for rate limits, retried) like any other queue error.
    pub fn report(&self, guild_id: GuildId, text_channel: Option<ChannelId>, error: PlayerError) {
        let mut queue = self.state.queue_ref(guild_id);
        if text_channel.is_some() {
            queue.text_channel = text_channel;
        }
        self.state.events.emit(QueueEvent::Error { queue, error });
    }

    fn call(&self, guild_id: GuildId) -> PlayerResult<Arc<Mutex<Call>>> {
        self.state
            .songbird
            .get(guild_id)
            .ok_or(PlayerError::NotConnected)
    }

    /// Join the target channel, wiring queue events the first time a call is created.
    async fn connect(&self, target: VoiceTarget) -> PlayerResult<Arc<Mutex<Call>>> {
        let songbird = &self.state.songbird;
        let fresh = songbird.get(target.guild_id).is_none();

        let call = match songbird.join(target.guild_id, target.channel_id).await {
            Ok(call) => call,
            Err(e) => {
                error!(
                    "Failed to join voice channel {} for guild {}: {}",
                    target.channel_id, target.guild_id, e
                );
                if fresh {
                    // Drop the half-initialised call so the next attempt starts clean
                    discard_call(songbird, target.guild_id).await;
                }
                return Err(PlayerError::Join(e.to_string()));
            }
        };

        if fresh {
            self.state.departing.remove(&target.guild_id);

            let mut handler = call.lock().await;
            let queue = handler.queue().clone();
            handler.add_global_event(
                Event::Track(TrackEvent::End),
                TrackEndNotifier {
                    guild_id: target.guild_id,
                    queue,
                    state: Arc::clone(&self.state),
                },
            );
            handler.add_global_event(
                Event::Track(TrackEvent::Error),
                TrackErrorNotifier {
                    guild_id: target.guild_id,
                    state: Arc::clone(&self.state),
                },
            );
            handler.add_global_event(
                Event::Core(CoreEvent::DriverDisconnect),
                DisconnectNotifier {
                    guild_id: target.guild_id,
                    state: Arc::clone(&self.state),
                },
            );
            info!(
                "Joined voice channel {} in guild {}",
                target.channel_id, target.guild_id
            );
        }

        Ok(call)
    }

    async fn enqueue(&self, call: &Arc<Mutex<Call>>, tracks: &[TrackInfo]) {
        let mut handler = call.lock().await;
        for info in tracks {
            let input = YoutubeDl::new_ytdl_like(
                self.resolver.program(),
                self.http.clone(),
                info.url.clone(),
            );
            let mut track = Track::from(input);
            track.user_data = Arc::new(info.clone());
            let _handle = handler.enqueue(track).await;
            debug!("Enqueued '{}' ({})", info.title, info.url);
        }
    }

    pub async fn skip(&self, guild_id: GuildId) -> PlayerResult<TrackInfo> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        let current = handler
            .queue()
            .current()
            .ok_or(PlayerError::NothingPlaying)?;

        handler
            .queue()
            .skip()
            .map_err(|e| PlayerError::Playback(e.to_string()))?;
        Ok(track_info(&current))
    }

    pub async fn pause(&self, guild_id: GuildId) -> PlayerResult<TrackInfo> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        let current = handler
            .queue()
            .current()
            .ok_or(PlayerError::NothingPlaying)?;

        handler
            .queue()
            .pause()
            .map_err(|e| PlayerError::Playback(e.to_string()))?;
        Ok(track_info(&current))
    }

    pub async fn resume(&self, guild_id: GuildId) -> PlayerResult<TrackInfo> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        let current = handler
            .queue()
            .current()
            .ok_or(PlayerError::NothingPlaying)?;

        handler
            .queue()
            .resume()
            .map_err(|e| PlayerError::Playback(e.to_string()))?;
        Ok(track_info(&current))
    }

    /// Current track first, then everything waiting behind it.
    pub async fn tracks(&self, guild_id: GuildId) -> PlayerResult<Vec<TrackInfo>> {
        let call = self.call(guild_id)?;
        let handler = call.lock().await;
        Ok(handler
            .queue()
            .current_queue()
            .iter()
            .map(track_info)
            .collect())
    }

    /// Clear the queue and leave the voice channel.
    pub async fn leave(&self, guild_id: GuildId) -> PlayerResult<()> {
        let call = self.call(guild_id)?;
        self.state.departing.insert(guild_id);
        call.lock().await.queue().stop();

        self.state
            .songbird
            .remove(guild_id)
            .await
            .map_err(|e| PlayerError::Join(e.to_string()))?;
        info!("Left voice channel in guild {}", guild_id);
        Ok(())
    }

    pub async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        let call = self.state.songbird.get(guild_id)?;
        let channel = call.lock().await.current_channel()?;
        Some(ChannelId::new(channel.0.get()))
    }

    /// Mark a guild as waiting out the empty-channel cooldown. Returns false if
    /// a cooldown is already running.
    pub fn begin_empty_watch(&self, guild_id: GuildId) -> bool {
        self.state.empty_watch.insert(guild_id)
    }

    pub fn end_empty_watch(&self, guild_id: GuildId) {
        self.state.empty_watch.remove(&guild_id);
    }

    /// Leave because nobody is listening any more, and say so.
    pub async fn leave_empty(&self, guild_id: GuildId) -> PlayerResult<()> {
        self.leave(guild_id).await?;
        self.state.events.emit(QueueEvent::Empty {
            queue: self.state.queue_ref(guild_id),
        });
        Ok(())
    }
}

#[async_trait]
impl QueueEngine for SongbirdPlayer {
    async fn play(
        &self,
        target: VoiceTarget,
        query: String,
        options: PlayOptions,
    ) -> PlayerResult<()> {
        let query = Query::parse(&query);
        if let Some(channel) = options.text_channel {
            self.state.text_channels.insert(target.guild_id, channel);
        }

        let resolved = self
            .resolver
            .resolve(&query, options.requester.as_ref())
            .await?;
        let call = self.connect(target).await?;
        let queue = self.state.queue_ref(target.guild_id);

        match resolved {
            Resolved::Track(track) => {
                self.enqueue(&call, std::slice::from_ref(&track)).await;
                info!("Queued '{}' in guild {}", track.title, target.guild_id);
                self.state
                    .events
                    .emit(QueueEvent::TrackAdded { queue, track });
            }
            Resolved::Playlist(playlist) => {
                self.enqueue(&call, &playlist.tracks).await;
                info!(
                    "Queued playlist '{}' ({} tracks) in guild {}",
                    playlist.name,
                    playlist.tracks.len(),
                    target.guild_id
                );
                self.state
                    .events
                    .emit(QueueEvent::PlaylistAdded { queue, playlist });
            }
        }

        Ok(())
    }
}

/// Remove a guild's call, if songbird still has one.
async fn discard_call(songbird: &Songbird, guild_id: GuildId) {
    if let Err(e) = songbird.remove(guild_id).await {
        debug!("Call for guild {} already gone: {}", guild_id, e);
    }
}

fn track_info(handle: &TrackHandle) -> TrackInfo {
    handle.data::<TrackInfo>().as_ref().clone()
}

/// Emits `Finished` once the last queued track ends
struct TrackEndNotifier {
    guild_id: GuildId,
    queue: TrackQueue,
    state: Arc<PlayerState>,
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(ended) = ctx {
            if self.state.departing.contains(&self.guild_id) {
                return None;
            }

            // The builtin queue may or may not have popped the ended tracks yet
            let remaining = self
                .queue
                .current_queue()
                .iter()
                .filter(|queued| ended.iter().all(|(_, done)| done.uuid() != queued.uuid()))
                .count();

            if remaining == 0 {
                info!("Queue finished for guild {}", self.guild_id);
                self.state.events.emit(QueueEvent::Finished {
                    queue: self.state.queue_ref(self.guild_id),
                });
            }
        }
        None
    }
}

struct TrackErrorNotifier {
    guild_id: GuildId,
    state: Arc<PlayerState>,
}

#[async_trait]
impl songbird::EventHandler for TrackErrorNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(failed) = ctx {
            for (track_state, handle) in failed.iter() {
                let info = track_info(handle);
                let reason = match &track_state.playing {
                    PlayMode::Errored(e) => format!("{e:?}"),
                    other => format!("{other:?}"),
                };
                warn!(
                    "Track '{}' failed in guild {}: {}",
                    info.title, self.guild_id, reason
                );

                self.state.events.emit(QueueEvent::Error {
                    queue: self.state.queue_ref(self.guild_id),
                    error: PlayerError::from_playback_failure(
                        info.source,
                        &info.title,
                        &reason,
                    ),
                });
            }
        }
        None
    }
}

struct DisconnectNotifier {
    guild_id: GuildId,
    state: Arc<PlayerState>,
}

#[async_trait]
impl songbird::EventHandler for DisconnectNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::DriverDisconnect(data) = ctx {
            if !self.state.departing.insert(self.guild_id) {
                debug!("Ignoring requested disconnect for guild {}", self.guild_id);
                return None;
            }

            warn!(
                "Voice driver disconnected in guild {} ({:?})",
                self.guild_id, data.reason
            );
            self.state.events.emit(QueueEvent::Disconnected {
                queue: self.state.queue_ref(self.guild_id),
            });

            let songbird = Arc::clone(&self.state.songbird);
            let guild_id = self.guild_id;
            tokio::spawn(async move { discard_call(&songbird, guild_id).await });
        }
        None
    }
}
