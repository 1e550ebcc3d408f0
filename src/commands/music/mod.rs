//! Command bodies shared by the prefix and slash surfaces.

mod pause;
mod play;
mod queue;
mod setchannel;
mod skip;
mod stop;

pub use pause::{pause, resume};
pub use play::play;
pub use queue::queue;
pub use setchannel::setchannel;
pub use skip::skip;
pub use stop::stop;

use serenity::all::GuildId;
use thiserror::Error;

use crate::{Context, Error};

#[derive(Error, Debug)]
pub enum MusicError {
    #[error("This command can only be used in a server")]
    NotInGuild,
}

fn guild_id(ctx: Context<'_>) -> Result<GuildId, Error> {
    ctx.guild_id()
        .ok_or_else(|| Box::new(MusicError::NotInGuild) as Error)
}
