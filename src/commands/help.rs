use crate::{CommandResult, Context};

pub async fn help(ctx: Context<'_>, command: Option<String>) -> CommandResult {
    let extra_text_at_bottom = format!(
        "Prefix commands start with `{}`. Slash commands work too.",
        ctx.data().config.prefix
    );

    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: &extra_text_at_bottom,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}
