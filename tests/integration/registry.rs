use rusty_tunes::commands::{CommandRegistry, Surface, prefix, slash};

use crate::assert_eq;
use crate::common;

#[test]
fn test_invalid_definitions_are_skipped() {
    common::init();

    let mut nameless = prefix::skip();
    nameless.name = String::new();
    let mut no_action = prefix::pause();
    no_action.prefix_action = None;

    let registry = CommandRegistry::load(vec![nameless, no_action, prefix::play()], vec![]);

    assert_eq!(registry.prefix_count(), 1);
    assert!(registry.prefix_command("play").is_some());
    assert!(registry.prefix_command("pause").is_none());
}

#[test]
fn test_duplicate_name_last_loaded_wins() {
    common::init();

    // Same public name, different implementations
    let mut impostor = prefix::queue();
    impostor.name = "play".to_string();

    let registry = CommandRegistry::load(vec![prefix::play(), impostor], vec![]);

    assert_eq!(registry.prefix_count(), 1);
    let play = registry.prefix_command("play").unwrap();
    assert_eq!(play.identifying_name, "queue");
}

#[test]
fn test_duplicate_slash_name_last_loaded_wins() {
    common::init();

    let mut replacement = slash::stop();
    replacement.name = "skip".to_string();

    let mut registry = CommandRegistry::new();
    registry.register(Surface::Slash, slash::skip()).unwrap();
    registry.register(Surface::Slash, replacement).unwrap();

    assert_eq!(registry.slash_count(), 1);
    assert_eq!(registry.slash_command("skip").unwrap().identifying_name, "stop");
}

#[test]
fn test_every_builtin_definition_loads() {
    common::init();

    let registry = CommandRegistry::load(prefix::all(), slash::all());

    assert_eq!(registry.prefix_count(), prefix::all().len());
    assert_eq!(registry.slash_count(), slash::all().len());

    let commands = registry.into_framework_commands();
    assert_eq!(commands.len(), slash::all().len());
    assert!(
        commands
            .iter()
            .all(|c| c.prefix_action.is_some() && c.slash_action.is_some())
    );
}
