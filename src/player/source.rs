//! Query parsing and track resolution through `yt-dlp`.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use super::Requester;
use super::error::{PlayerError, PlayerResult};

/// Where a track is searched for or streamed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    SoundCloud,
    YouTube,
    /// Any other site yt-dlp understands
    Direct,
}

impl Source {
    /// Source used for plain-text searches
    pub const PRIMARY: Source = Source::SoundCloud;
    /// Source retried when the primary one rate-limits
    pub const FALLBACK: Source = Source::YouTube;

    /// The search prefix users can type (`ytsearch:lofi`)
    pub fn search_prefix(self) -> Option<&'static str> {
        match self {
            Source::SoundCloud => Some("scsearch:"),
            Source::YouTube => Some("ytsearch:"),
            Source::Direct => None,
        }
    }

    /// Build a query that searches `terms` on this source.
    pub fn search_query(self, terms: &str) -> String {
        match self.search_prefix() {
            Some(prefix) => format!("{prefix}{terms}"),
            None => terms.to_string(),
        }
    }

    fn from_url(url: &Url) -> Self {
        match url.host_str() {
            Some(host) if host == "soundcloud.com" || host.ends_with(".soundcloud.com") => {
                Source::SoundCloud
            }
            Some(host)
                if host == "youtu.be"
                    || host == "youtube.com"
                    || host.ends_with(".youtube.com") =>
            {
                Source::YouTube
            }
            _ => Source::Direct,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::SoundCloud => write!(f, "SoundCloud"),
            Source::YouTube => write!(f, "YouTube"),
            Source::Direct => write!(f, "Direct"),
        }
    }
}

/// A play request as typed by a user
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Url(Url),
    Search { source: Source, terms: String },
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        for source in [Source::YouTube, Source::SoundCloud] {
            if let Some(terms) = source.search_prefix().and_then(|p| raw.strip_prefix(p)) {
                return Query::Search {
                    source,
                    terms: terms.trim().to_string(),
                };
            }
        }

        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Query::Url(url),
            _ => Query::Search {
                source: Source::PRIMARY,
                terms: raw.to_string(),
            },
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Query::Url(url) => Source::from_url(url),
            Query::Search { source, .. } => *source,
        }
    }

    /// The argument handed to yt-dlp; searches are limited to the best hit.
    pub fn ytdl_target(&self) -> String {
        match self {
            Query::Url(url) => url.to_string(),
            Query::Search { source, terms } => match source.search_prefix() {
                Some(prefix) => format!("{}1:{}", prefix.trim_end_matches(':'), terms),
                None => terms.clone(),
            },
        }
    }

    fn is_search(&self) -> bool {
        matches!(self, Query::Search { .. })
    }

    /// The part of the query the user typed, which yt-dlp echoes back in
    /// its error output.
    pub fn user_text(&self) -> &str {
        match self {
            Query::Url(url) => url.as_str(),
            Query::Search { terms, .. } => terms,
        }
    }

    /// Arguments for `yt-dlp -J`. Playlists are listed flat; a search keeps
    /// full metadata since only its first hit is used.
    fn ytdl_args(&self) -> Vec<String> {
        let mut args = vec!["-J".to_string(), "--no-warnings".to_string()];
        if !self.is_search() {
            args.push("--flat-playlist".to_string());
        }
        args.push(self.ytdl_target());
        args
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Url(url) => write!(f, "{url}"),
            Query::Search { source, terms } => write!(f, "{} ({source})", terms),
        }
    }
}

/// Metadata stored alongside every queued songbird track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub url: String,
    pub duration: Option<Duration>,
    pub thumbnail: Option<String>,
    pub requester: Option<Requester>,
    pub source: Source,
}

impl TrackInfo {
    pub fn formatted_duration(&self) -> String {
        self.duration
            .map(format_duration)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistInfo {
    pub name: String,
    pub url: String,
    pub tracks: Vec<TrackInfo>,
    pub requester: Option<Requester>,
}

/// What a query resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Track(TrackInfo),
    Playlist(PlaylistInfo),
}

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[derive(Deserialize, Debug, Default)]
struct YtDlpEntry {
    #[serde(rename = "_type")]
    kind: Option<String>,
    title: Option<String>,
    webpage_url: Option<String>,
    original_url: Option<String>,
    url: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnails: Vec<YtDlpThumbnail>,
    #[serde(default)]
    entries: Vec<Option<YtDlpEntry>>,
}

#[derive(Deserialize, Debug)]
struct YtDlpThumbnail {
    url: String,
}

impl YtDlpEntry {
    fn into_track(self, fallback_source: Source, requester: Option<&Requester>) -> Option<TrackInfo> {
        let url = self.webpage_url.or(self.original_url).or(self.url)?;
        let source = match Url::parse(&url) {
            Ok(parsed) => match Source::from_url(&parsed) {
                Source::Direct => fallback_source,
                source => source,
            },
            Err(_) => fallback_source,
        };

        Some(TrackInfo {
            title: self.title.unwrap_or_else(|| url.clone()),
            url,
            duration: self
                .duration
                .and_then(|d| Duration::try_from_secs_f64(d).ok()),
            thumbnail: self
                .thumbnail
                .or_else(|| self.thumbnails.into_iter().last().map(|t| t.url)),
            requester: requester.cloned(),
            source,
        })
    }
}

/// Turn the `yt-dlp -J` output for `query` into a track or playlist.
pub fn parse_resolution(
    json: &[u8],
    query: &Query,
    requester: Option<&Requester>,
) -> PlayerResult<Resolved> {
    let root: YtDlpEntry = serde_json::from_slice(json)
        .map_err(|e| PlayerError::Source(format!("Failed to parse yt-dlp output: {e}")))?;
    let source = query.source();

    if root.kind.as_deref() != Some("playlist") {
        return root
            .into_track(source, requester)
            .map(Resolved::Track)
            .ok_or_else(|| PlayerError::NoResult(query.to_string()));
    }

    let name = root.title.clone();
    let url = root.webpage_url.clone();
    let mut tracks = root
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.into_track(source, requester));

    if query.is_search() {
        return tracks
            .next()
            .map(Resolved::Track)
            .ok_or_else(|| PlayerError::NoResult(query.to_string()));
    }

    let tracks: Vec<TrackInfo> = tracks.collect();
    if tracks.is_empty() {
        return Err(PlayerError::NoResult(query.to_string()));
    }

    Ok(Resolved::Playlist(PlaylistInfo {
        name: name.unwrap_or_else(|| "Playlist".to_string()),
        url: url.unwrap_or_else(|| query.ytdl_target()),
        tracks,
        requester: requester.cloned(),
    }))
}

/// Runs the `yt-dlp` binary to resolve queries
#[derive(Debug, Clone)]
pub struct YtDlp {
    // songbird's streaming input needs the program name for the whole run
    program: &'static str,
}

impl YtDlp {
    pub fn new(program: &'static str) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    pub async fn resolve(
        &self,
        query: &Query,
        requester: Option<&Requester>,
    ) -> PlayerResult<Resolved> {
        if let Query::Search { terms, .. } = query {
            if terms.is_empty() {
                return Err(PlayerError::NoResult(query.to_string()));
            }
        }

        let target = query.ytdl_target();
        info!("Resolving {} via {}", target, self.program);

        let output = Command::new(self.program)
            .args(query.ytdl_args())
            .output()
            .await
            .map_err(|e| PlayerError::Source(format!("Failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp failed for {}: {}", target, stderr.trim());
            return Err(PlayerError::from_source_failure(
                query.source(),
                stderr.trim(),
                query.user_text(),
            ));
        }

        parse_resolution(&output.stdout, query, requester)
    }
}
