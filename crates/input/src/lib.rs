//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework beyond the
//! `crossterm` event types. It maps key events into app commands and raw key
//! strokes, and resolves strokes into normalized attempts for the round
//! engine (including terminals without key-release events).

pub mod map;
pub mod resolver;

pub use whack_a_braille_types as types;

pub use map::{command_for_key, key_stroke, route_key, should_quit, AppCommand, KeyStroke};
pub use resolver::{AttemptSink, InputResolver, KeyDisposition};
