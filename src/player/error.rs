use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::source::Source;

/// Matches the ways yt-dlp and SoundCloud report throttling.
static RATE_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b429\b|too many requests|rate[ -]?limit").expect("valid rate limit pattern")
});

/// Errors raised by the queue engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("SoundCloud rate limit reached: {0}")]
    RateLimited(String),

    #[error("No results found for `{0}`")]
    NoResult(String),

    #[error("Audio source error: {0}")]
    Source(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Nothing is playing")]
    NothingPlaying,
}

impl PlayerError {
    /// Classify a failure reported while resolving from `source`. `user_text`
    /// is what the user typed; yt-dlp echoes it back, so it is ignored when
    /// looking for a rate limit.
    pub fn from_source_failure(
        source: Source,
        message: impl Into<String>,
        user_text: &str,
    ) -> Self {
        let message = message.into();
        let reported = if user_text.is_empty() {
            message.clone()
        } else {
            message.replace(user_text, " ")
        };

        if is_throttled(source, &reported) {
            Self::RateLimited(message)
        } else {
            Self::Source(message)
        }
    }

    /// Classify a failure raised by songbird while the track `title` was
    /// streaming. Only `reason` is checked for a rate limit.
    pub fn from_playback_failure(source: Source, title: &str, reason: &str) -> Self {
        let message = format!("Could not play {title}: {reason}");
        if is_throttled(source, reason) {
            Self::RateLimited(message)
        } else {
            Self::Playback(message)
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited(_) => "SOUNDCLOUD_PLUGIN_RATE_LIMITED",
            Self::NoResult(_) => "NO_RESULT",
            Self::Source(_) => "SOURCE_ERROR",
            Self::Playback(_) => "PLAYBACK_ERROR",
            Self::Join(_) => "VOICE_CONNECT_FAILED",
            Self::NotConnected => "NOT_CONNECTED",
            Self::NothingPlaying => "NOTHING_PLAYING",
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

fn is_throttled(source: Source, reason: &str) -> bool {
    source == Source::SoundCloud && RATE_LIMIT.is_match(reason)
}

pub type PlayerResult<T> = Result<T, PlayerError>;
