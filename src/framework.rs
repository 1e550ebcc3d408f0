//! poise framework configuration: prefix dispatch rules, error replies and
//! the startup sequence run on the first `Ready`.

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{CreateReply, FrameworkError};
use serenity::{ActivityData, Command, CreateCommand};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::commands::BotCommand;
use crate::config::Config;
use crate::events;
use crate::fallback::{FallbackCoordinator, VoiceLookup};
use crate::notifications::{Announcer, Notifier};
use crate::player::{QueueEngine, QueueEvent, SongbirdPlayer};
use crate::state::GuildMemory;
use crate::{Data, Error};

pub const FAILURE_MESSAGE: &str = "❌ Something went wrong while running that command.";

/// Everything the startup sequence needs to produce [`Data`]
pub struct Startup {
    pub config: Arc<Config>,
    pub slash_definitions: Vec<CreateCommand>,
    pub player: Arc<SongbirdPlayer>,
    pub memory: Arc<GuildMemory>,
    pub events: mpsc::UnboundedReceiver<QueueEvent>,
}

pub fn prefix_options(prefix: &str) -> poise::PrefixFrameworkOptions<Data, Error> {
    poise::PrefixFrameworkOptions {
        prefix: Some(prefix.to_string()),
        mention_as_prefix: false,
        ignore_bots: true,
        case_insensitive_commands: true,
        ..Default::default()
    }
}

pub fn options(commands: Vec<BotCommand>, prefix: &str) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands,
        prefix_options: prefix_options(prefix),
        on_error: |error| Box::pin(on_error(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                debug!(
                    "Running `{}` for {}",
                    ctx.command().qualified_name,
                    ctx.author().name
                );
            })
        },
        event_handler: |ctx, event, framework, data| {
            Box::pin(events::handler(ctx, event, framework, data))
        },
        ..Default::default()
    }
}

pub fn build(commands: Vec<BotCommand>, startup: Startup) -> poise::Framework<Data, Error> {
    let prefix = startup.config.prefix.clone();

    poise::Framework::builder()
        .options(options(commands, &prefix))
        .setup(move |ctx, ready, _framework| Box::pin(setup(ctx, ready, startup)))
        .build()
}

async fn setup(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    startup: Startup,
) -> Result<Data, Error> {
    let Startup {
        config,
        slash_definitions,
        player,
        memory,
        events,
    } = startup;

    info!("Connected as {}", ready.user.name);
    ctx.set_activity(Some(ActivityData::watching(format!("{}help", config.prefix))));

    let count = slash_definitions.len();
    match Command::set_global_commands(&ctx.http, slash_definitions).await {
        Ok(registered) => info!("Registered {} of {} slash commands", registered.len(), count),
        Err(e) => error!("Failed to register slash commands: {}", e),
    }

    if ready.application.id != config.application_id {
        warn!(
            "CLIENT_ID {} does not match the connected application {}",
            config.application_id, ready.application.id
        );
    }
    info!("Invite link: {}", config.invite_url());

    let announcer: Arc<dyn Announcer> = ctx.http.clone();
    let voice: Arc<dyn VoiceLookup> = ctx.cache.clone();
    let engine: Arc<dyn QueueEngine> = player.clone();
    let fallback = Arc::new(FallbackCoordinator::new(
        engine,
        voice,
        Arc::clone(&announcer),
        Arc::clone(&memory),
    ));
    tokio::spawn(Notifier::new(announcer, fallback).run(events));

    Ok(Data {
        player,
        memory,
        config,
    })
}

/// The generic reply sent when a command fails
pub fn failure_reply() -> CreateReply {
    CreateReply::default()
        .content(FAILURE_MESSAGE)
        .ephemeral(true)
        .reply(true)
}

/// The framework errors `on_error` tells apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnknownCommand,
    UnknownInteraction,
    Command,
    Panic,
    Other,
}

pub enum FailureAction {
    Ignore,
    Reply(CreateReply),
    /// Hand the error to poise's builtin handler
    Delegate,
}

pub fn failure_kind(error: &FrameworkError<'_, Data, Error>) -> FailureKind {
    match error {
        FrameworkError::UnknownCommand { .. } => FailureKind::UnknownCommand,
        FrameworkError::UnknownInteraction { .. } => FailureKind::UnknownInteraction,
        FrameworkError::Command { .. } => FailureKind::Command,
        FrameworkError::CommandPanic { .. } => FailureKind::Panic,
        _ => FailureKind::Other,
    }
}

pub fn failure_action(kind: FailureKind) -> FailureAction {
    match kind {
        FailureKind::UnknownCommand | FailureKind::UnknownInteraction => FailureAction::Ignore,
        FailureKind::Command | FailureKind::Panic => FailureAction::Reply(failure_reply()),
        FailureKind::Other => FailureAction::Delegate,
    }
}

fn log_failure(error: &FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::UnknownCommand { msg_content, .. } => {
            trace!("Ignoring unknown command: {}", msg_content);
        }
        FrameworkError::UnknownInteraction { interaction, .. } => {
            trace!("Ignoring unknown slash command: {}", interaction.data.name);
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().qualified_name, error);
        }
        FrameworkError::CommandPanic { payload, ctx, .. } => {
            error!(
                "Command `{}` panicked: {}",
                ctx.command().qualified_name,
                payload.as_deref().unwrap_or("no panic message")
            );
        }
        _ => {}
    }
}

async fn on_error(error: FrameworkError<'_, Data, Error>) {
    log_failure(&error);
    match failure_action(failure_kind(&error)) {
        FailureAction::Ignore => {}
        FailureAction::Reply(reply) => {
            let Some(ctx) = error.ctx() else {
                return;
            };
            if let Err(e) = ctx.send(reply).await {
                warn!("Failed to send failure reply: {}", e);
            }
        }
        FailureAction::Delegate => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
