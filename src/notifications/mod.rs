//! Turns queue events into chat messages.

pub mod embeds;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateEmbed, CreateMessage, Http};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::fallback::{FallbackCoordinator, FallbackOutcome};
use crate::player::QueueEvent;

/// Somewhere embeds can be posted
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Fire-and-forget: failures are logged, never returned.
    async fn announce(&self, channel: ChannelId, embed: CreateEmbed);
}

#[async_trait]
impl Announcer for Http {
    async fn announce(&self, channel: ChannelId, embed: CreateEmbed) {
        if let Err(e) = channel
            .send_message(self, CreateMessage::new().embed(embed))
            .await
        {
            warn!("Failed to send notification to channel {}: {}", channel, e);
        }
    }
}

/// Consumes the queue event stream, one event at a time
pub struct Notifier {
    announcer: Arc<dyn Announcer>,
    fallback: Arc<FallbackCoordinator>,
}

impl Notifier {
    pub fn new(announcer: Arc<dyn Announcer>, fallback: Arc<FallbackCoordinator>) -> Self {
        Self {
            announcer,
            fallback,
        }
    }

    /// Announce one event. A rate limit also starts the fallback on its own
    /// task, whose handle is returned.
    pub async fn dispatch(&self, event: QueueEvent) -> Option<JoinHandle<FallbackOutcome>> {
        let queue = event.queue();
        let Some(channel) = queue.text_channel else {
            debug!(
                "No text channel known for guild {}, dropping {:?}",
                queue.guild_id, event
            );
            return None;
        };

        if let QueueEvent::Error { error, .. } = &event {
            error!(
                "Queue error in guild {} [{}]: {}",
                queue.guild_id,
                error.code(),
                error
            );
        }

        self.announcer
            .announce(channel, embeds::for_event(&event))
            .await;

        match &event {
            QueueEvent::Error { error, .. } if error.is_rate_limited() => {
                let fallback = Arc::clone(&self.fallback);
                Some(tokio::spawn(async move {
                    let outcome = fallback.recover(queue.guild_id, channel).await;
                    debug!("Fallback for guild {} ended: {:?}", queue.guild_id, outcome);
                    outcome
                }))
            }
            _ => None,
        }
    }

    /// Run until every sender of the event stream is gone.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<QueueEvent>) {
        info!("Notifier listening for queue events");
        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
        }
        info!("Queue event stream closed, notifier stopping");
    }
}
