//! Test suite for the rusty-tunes bot
//! Integration tests drive the command registry, the notifier and the
//! fallback through their trait seams with mocked collaborators.

pub mod common;
pub mod integration;

// Re-export commonly used testing utilities
pub use assert_matches::assert_matches;
pub use pretty_assertions::assert_eq;
