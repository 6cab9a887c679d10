//! Whack-a-Braille (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and holds the terminal
//! host: configuration, effect routing, the session state machine and the
//! results log.

pub use whack_a_braille_core as core;
pub use whack_a_braille_input as input;
pub use whack_a_braille_speech as speech;
pub use whack_a_braille_term as term;
pub use whack_a_braille_types as types;

pub mod config;
pub mod dispatch;
pub mod results;
pub mod session;
