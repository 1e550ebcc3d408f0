use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rusty_tunes::fallback::{FallbackCoordinator, FallbackOutcome};
use rusty_tunes::notifications::{Announcer, Notifier};
use rusty_tunes::player::{
    EventBus, PlayOptions, PlayerError, PlayerResult, QueueEngine, QueueEvent, QueueRef,
    VoiceTarget,
};
use rusty_tunes::state::GuildMemory;
use serenity::all::{ChannelId, GuildId};

use crate::assert_eq;
use crate::common::fixtures::{self, GUILD, REQUESTER_VOICE, TEXT_CHANNEL};
use crate::common::mocks::{self, MockEngine};
use crate::common;

/// An engine whose play never completes, like a yt-dlp run that hangs
struct StalledEngine;

#[async_trait]
impl QueueEngine for StalledEngine {
    async fn play(&self, _: VoiceTarget, _: String, _: PlayOptions) -> PlayerResult<()> {
        std::future::pending().await
    }
}

fn notifier(
    engine: impl QueueEngine + 'static,
    memory: Arc<GuildMemory>,
) -> (Notifier, mocks::Sent) {
    let (announcer, sent) = mocks::recording_announcer();
    let announcer: Arc<dyn Announcer> = Arc::new(announcer);
    let fallback = Arc::new(FallbackCoordinator::new(
        Arc::new(engine),
        Arc::new(mocks::voice_lookup(Some(REQUESTER_VOICE))),
        Arc::clone(&announcer),
        memory,
    ));
    (Notifier::new(announcer, fallback), sent)
}

#[tokio::test]
async fn test_track_added_sends_one_message() {
    common::init();
    let (notifier, sent) = notifier(mocks::idle_engine(), Arc::default());

    notifier
        .dispatch(QueueEvent::TrackAdded {
            queue: fixtures::queue(),
            track: fixtures::track("X", 201, "Y"),
        })
        .await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (channel, embed) = &sent[0];
    assert_eq!(*channel, TEXT_CHANNEL);

    let text = embed.to_string();
    assert!(text.contains("X"));
    assert!(text.contains("3:21"));
    assert!(text.contains("\"Y\""));
}

#[tokio::test]
async fn test_event_without_text_channel_is_dropped() {
    common::init();
    let (notifier, sent) = notifier(mocks::idle_engine(), Arc::default());

    notifier
        .dispatch(QueueEvent::Finished {
            queue: QueueRef {
                guild_id: GUILD,
                text_channel: None,
            },
        })
        .await;

    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ordinary_error_is_announced_without_fallback() {
    common::init();
    let (notifier, sent) = notifier(mocks::idle_engine(), Arc::default());

    notifier
        .dispatch(QueueEvent::Error {
            queue: fixtures::queue(),
            error: PlayerError::Source("geo restricted".to_string()),
        })
        .await;

    assert_eq!(mocks::titles(&sent), vec!["❌ Playback error"]);
}

#[tokio::test]
async fn test_rate_limit_triggers_exactly_one_fallback_play() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("lofi beats"));

    let mut engine = MockEngine::new();
    engine
        .expect_play()
        .withf(|_, query, _| query == "ytsearch:lofi beats")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (notifier, sent) = notifier(engine, memory);
    let fallback = notifier
        .dispatch(QueueEvent::Error {
            queue: fixtures::queue(),
            error: PlayerError::RateLimited("HTTP Error 429".to_string()),
        })
        .await
        .expect("rate limit starts a fallback");

    assert_eq!(fallback.await.unwrap(), FallbackOutcome::Retried);

    assert_eq!(
        mocks::titles(&sent),
        vec!["❌ Playback error", "⚠️ SoundCloud rate limit reached"]
    );
}

#[tokio::test]
async fn test_run_drains_events_in_order() {
    common::init();
    let (notifier, sent) = notifier(mocks::idle_engine(), Arc::default());
    let (bus, events) = EventBus::new();

    bus.emit(QueueEvent::TrackAdded {
        queue: fixtures::queue(),
        track: fixtures::track("First", 60, "Y"),
    });
    bus.emit(QueueEvent::Finished {
        queue: fixtures::queue(),
    });
    drop(bus);

    notifier.run(events).await;

    assert_eq!(
        mocks::titles(&sent),
        vec!["➕ Track added", "✅ Playback finished"]
    );
}

#[tokio::test]
async fn test_stalled_fallback_does_not_hold_up_other_guilds() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("lofi beats"));

    let (notifier, sent) = notifier(StalledEngine, memory);
    let (bus, events) = EventBus::new();
    let other_channel = ChannelId::new(999);

    bus.emit(QueueEvent::Error {
        queue: fixtures::queue(),
        error: PlayerError::RateLimited("HTTP Error 429".to_string()),
    });
    bus.emit(QueueEvent::Finished {
        queue: QueueRef {
            guild_id: GuildId::new(999),
            text_channel: Some(other_channel),
        },
    });
    drop(bus);

    tokio::time::timeout(Duration::from_secs(5), notifier.run(events))
        .await
        .expect("notifier drained the stream while the fallback was stuck");

    let sent = sent.lock().unwrap();
    assert!(
        sent.iter()
            .any(|(channel, embed)| *channel == other_channel
                && embed["title"] == "✅ Playback finished")
    );
}
