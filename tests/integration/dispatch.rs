use rstest::rstest;
use rusty_tunes::commands::{BotCommand, CommandRegistry, prefix, slash};
use rusty_tunes::framework;

use crate::assert_eq;

fn commands() -> Vec<BotCommand> {
    CommandRegistry::load(prefix::all(), slash::all()).into_framework_commands()
}

/// Resolve a message the way prefix dispatch does: strip the prefix, then
/// match the first token against the command names.
fn resolve<'a>(
    commands: &'a [BotCommand],
    prefix: &str,
    content: &'a str,
) -> Option<(&'a str, &'a str)> {
    let rest = content.strip_prefix(prefix)?;
    let (command, _, args) = poise::find_command(commands, rest, true, &mut Vec::new())?;
    Some((command.name.as_str(), args))
}

#[test]
fn test_play_with_arguments() {
    let commands = commands();
    assert_eq!(
        resolve(&commands, "!", "!play lofi beats"),
        Some(("play", "lofi beats"))
    );
}

#[rstest]
#[case("!PLAY lofi", Some(("play", "lofi")))]
#[case("!Queue", Some(("queue", "")))]
#[case("!p lofi", Some(("play", "lofi")))]
#[case("play lofi", None)]
#[case("hello there", None)]
#[case("!dance", None)]
fn test_message_resolution(#[case] content: &str, #[case] expected: Option<(&str, &str)>) {
    let commands = commands();
    assert_eq!(resolve(&commands, "!", content), expected);
}

#[test]
fn test_configured_prefix_is_used() {
    let options = framework::options(commands(), "?");

    assert_eq!(options.prefix_options.prefix.as_deref(), Some("?"));
    assert!(options.prefix_options.ignore_bots);
    assert!(!options.prefix_options.mention_as_prefix);
}
