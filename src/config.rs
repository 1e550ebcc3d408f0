//! Runtime configuration read from the process environment.

use std::env;
use std::time::Duration;

use humantime_serde::re::humantime;
use serenity::all::ApplicationId;
use thiserror::Error;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_EMPTY_COOLDOWN: Duration = Duration::from_secs(60);
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

/// Permissions requested by the invite link (connect, speak, send messages, embeds...).
const INVITE_PERMISSIONS: u64 = 274877990912;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} in the environment")]
    Missing(&'static str),

    #[error("CLIENT_ID must be a non-zero numeric id, got `{0}`")]
    InvalidApplicationId(String),

    #[error("EMPTY_COOLDOWN is not a valid duration (`{value}`): {reason}")]
    InvalidDuration { value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub application_id: ApplicationId,
    pub prefix: String,
    pub empty_cooldown: Duration,
    pub ytdlp_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let raw_id = get("CLIENT_ID").ok_or(ConfigError::Missing("CLIENT_ID"))?;
        let application_id = raw_id
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(ApplicationId::new)
            .ok_or_else(|| ConfigError::InvalidApplicationId(raw_id.clone()))?;

        let empty_cooldown = match get("EMPTY_COOLDOWN") {
            Some(value) => humantime::parse_duration(&value).map_err(|e| {
                ConfigError::InvalidDuration {
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_EMPTY_COOLDOWN,
        };

        Ok(Self {
            discord_token,
            application_id,
            prefix: get("PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            empty_cooldown,
            ytdlp_path: get("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string()),
        })
    }

    pub fn invite_url(&self) -> String {
        format!(
            "https://discord.com/oauth2/authorize?client_id={}&permissions={}&scope=bot%20applications.commands",
            self.application_id, INVITE_PERMISSIONS
        )
    }
}
