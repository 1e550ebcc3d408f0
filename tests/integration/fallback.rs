use std::sync::Arc;

use rusty_tunes::fallback::{FallbackCoordinator, FallbackOutcome};
use rusty_tunes::player::{PlayerError, VoiceTarget};
use rusty_tunes::state::GuildMemory;

use crate::common::fixtures::{self, DEFAULT_VOICE, GUILD, REQUESTER_VOICE, TEXT_CHANNEL};
use crate::common::mocks::{self, MockEngine};
use crate::common;
use crate::{assert_eq, assert_matches};

fn coordinator(
    engine: MockEngine,
    voice: Option<serenity::all::ChannelId>,
    memory: Arc<GuildMemory>,
) -> (FallbackCoordinator, mocks::Sent) {
    let (announcer, sent) = mocks::recording_announcer();
    let coordinator = FallbackCoordinator::new(
        Arc::new(engine),
        Arc::new(mocks::voice_lookup(voice)),
        Arc::new(announcer),
        memory,
    );
    (coordinator, sent)
}

#[tokio::test]
async fn test_retries_remembered_search_on_youtube() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("lofi beats"));

    let mut engine = MockEngine::new();
    engine
        .expect_play()
        .withf(|target, query, options| {
            *target
                == VoiceTarget {
                    guild_id: GUILD,
                    channel_id: REQUESTER_VOICE,
                }
                && query == "ytsearch:lofi beats"
                && options.requester == Some(fixtures::requester("Y"))
                && options.text_channel == Some(TEXT_CHANNEL)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (coordinator, sent) = coordinator(engine, Some(REQUESTER_VOICE), memory);
    let outcome = coordinator.recover(GUILD, TEXT_CHANNEL).await;

    assert_eq!(outcome, FallbackOutcome::Retried);
    assert_eq!(mocks::titles(&sent), vec!["⚠️ SoundCloud rate limit reached"]);
}

#[tokio::test]
async fn test_uses_guild_default_when_requester_left_voice() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("jazz"));
    memory.set_default_channel(GUILD, DEFAULT_VOICE);

    let mut engine = MockEngine::new();
    engine
        .expect_play()
        .withf(|target, query, _| target.channel_id == DEFAULT_VOICE && query == "ytsearch:jazz")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let (coordinator, _) = coordinator(engine, None, memory);

    assert_eq!(
        coordinator.recover(GUILD, TEXT_CHANNEL).await,
        FallbackOutcome::Retried
    );
}

#[tokio::test]
async fn test_no_target_announces_and_does_not_play() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("lofi beats"));

    let (coordinator, sent) = coordinator(mocks::idle_engine(), None, memory);
    let outcome = coordinator.recover(GUILD, TEXT_CHANNEL).await;

    assert_eq!(outcome, FallbackOutcome::NoTarget);
    assert_eq!(
        mocks::titles(&sent),
        vec![
            "⚠️ SoundCloud rate limit reached",
            "⚠️ No voice channel available"
        ]
    );
    assert!(sent.lock().unwrap().iter().all(|(c, _)| *c == TEXT_CHANNEL));
}

#[tokio::test]
async fn test_no_remembered_search_is_no_target() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.set_default_channel(GUILD, DEFAULT_VOICE);

    let (coordinator, sent) = coordinator(mocks::idle_engine(), Some(REQUESTER_VOICE), memory);

    assert_eq!(
        coordinator.recover(GUILD, TEXT_CHANNEL).await,
        FallbackOutcome::NoTarget
    );
    assert_eq!(sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_from_another_guild_is_not_used() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(serenity::all::GuildId::new(999), fixtures::search("other"));

    let (coordinator, _) = coordinator(mocks::idle_engine(), Some(REQUESTER_VOICE), memory);

    assert_eq!(
        coordinator.recover(GUILD, TEXT_CHANNEL).await,
        FallbackOutcome::NoTarget
    );
}

#[tokio::test]
async fn test_failed_retry_is_announced_once() {
    common::init();
    let memory = Arc::new(GuildMemory::new());
    memory.remember_search(GUILD, fixtures::search("lofi beats"));

    let mut engine = MockEngine::new();
    engine
        .expect_play()
        .times(1)
        .returning(|_, query, _| Err(PlayerError::NoResult(query)));

    let (coordinator, sent) = coordinator(engine, Some(REQUESTER_VOICE), memory);
    let outcome = coordinator.recover(GUILD, TEXT_CHANNEL).await;

    assert_matches!(outcome, FallbackOutcome::Failed(PlayerError::NoResult(q)) if q == "ytsearch:lofi beats");
    assert_eq!(
        mocks::titles(&sent),
        vec!["⚠️ SoundCloud rate limit reached", "❌ Fallback failed"]
    );
}
