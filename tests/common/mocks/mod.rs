//! Mock implementations of the seams between the bot's components

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use rusty_tunes::fallback::VoiceLookup;
use rusty_tunes::notifications::Announcer;
use rusty_tunes::player::{PlayOptions, PlayerResult, QueueEngine, VoiceTarget};
use serenity::all::{ChannelId, CreateEmbed, GuildId, UserId};

mock! {
    pub Engine {}

    #[async_trait]
    impl QueueEngine for Engine {
        async fn play(
            &self,
            target: VoiceTarget,
            query: String,
            options: PlayOptions,
        ) -> PlayerResult<()>;
    }
}

mock! {
    pub Chat {}

    #[async_trait]
    impl Announcer for Chat {
        async fn announce(&self, channel: ChannelId, embed: CreateEmbed);
    }
}

mock! {
    pub Voice {}

    impl VoiceLookup for Voice {
        fn member_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId>;
    }
}

/// Every message an announcer was asked to send, as serialized embeds
pub type Sent = Arc<Mutex<Vec<(ChannelId, serde_json::Value)>>>;

/// An announcer that accepts any number of messages and records them
pub fn recording_announcer() -> (MockChat, Sent) {
    let sent: Sent = Arc::default();
    let recorder = Arc::clone(&sent);

    let mut announcer = MockChat::new();
    announcer.expect_announce().returning(move |channel, embed| {
        let json = serde_json::to_value(&embed).expect("embed serializes");
        recorder.lock().unwrap().push((channel, json));
    });
    (announcer, sent)
}

/// Titles of the recorded messages, in send order
pub fn titles(sent: &Sent) -> Vec<String> {
    sent.lock()
        .unwrap()
        .iter()
        .map(|(_, embed)| embed["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// A voice lookup where the requester is in `channel`, or nowhere
pub fn voice_lookup(channel: Option<ChannelId>) -> MockVoice {
    let mut voice = MockVoice::new();
    voice
        .expect_member_channel()
        .returning(move |_, _| channel);
    voice
}

/// An engine that must never be asked to play
pub fn idle_engine() -> MockEngine {
    let mut engine = MockEngine::new();
    engine.expect_play().never();
    engine
}
