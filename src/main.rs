use std::sync::Arc;

use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::{SerenityInit, Songbird};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rusty_tunes::commands::{self, CommandRegistry};
use rusty_tunes::config::Config;
use rusty_tunes::framework::{self, Startup};
use rusty_tunes::player::{EventBus, SongbirdPlayer, YtDlp};
use rusty_tunes::state::GuildMemory;
use rusty_tunes::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rusty_tunes=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    // Panics in tasks are logged; the process keeps running
    std::panic::set_hook(Box::new(|info| {
        error!("Panic: {}", info);
    }));

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    // Lives for the whole process
    let ytdlp_path: &'static str = Box::leak(config.ytdlp_path.clone().into_boxed_str());

    let songbird = Songbird::serenity();
    let (bus, events) = EventBus::new();
    let player = Arc::new(SongbirdPlayer::new(
        Arc::clone(&songbird),
        YtDlp::new(ytdlp_path),
        bus,
    ));

    let registry = CommandRegistry::load(commands::prefix::all(), commands::slash::all());
    let slash_definitions = registry.slash_definitions();

    let framework = framework::build(
        registry.into_framework_commands(),
        Startup {
            config: Arc::clone(&config),
            slash_definitions,
            player,
            memory: Arc::new(GuildMemory::new()),
            events,
        },
    );

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .register_songbird_with(songbird)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                shard_manager.shutdown_all().await;
            }
            Err(e) => warn!("Could not listen for Ctrl-C: {}", e),
        }
    });

    info!("Starting client with prefix `{}`", config.prefix);
    client.start().await.map_err(Into::into)
}
