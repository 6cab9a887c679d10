//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for the mole board. It avoids
//! ratatui widgets/layout and instead renders into a simple framebuffer
//! that is diffed and flushed to the terminal each frame.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Render without allocating once the framebuffer is warm
//! - Own every terminal mode the game switches on (raw mode, paste, key releases)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use whack_a_braille_core as core;
pub use whack_a_braille_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, HudView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
