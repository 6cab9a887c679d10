//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the braille catalog, the round engine and the scoring
//! and timing rules. It performs **no I/O**: speech, audio, drawing and input
//! capture are collaborators that the engine talks to through an ordered
//! stream of [`RoundEffect`]s. That makes it:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same round
//! - **Testable**: timers are deadlines on an engine clock advanced by `tick`
//! - **Race-safe**: every timer, speech settlement and attempt carries a mole
//!   id and is dropped if that mole is no longer the active one
//!
//! # Module Structure
//!
//! - [`registry`]: immutable braille catalog and mode-filtered item pools
//! - [`round`]: the round engine (lifecycle, mole cycle, attempt resolution)
//! - [`effects`]: instructions emitted by the engine for its collaborators
//! - [`timing`]: difficulty ramp, inter-mole gap and mole window sizing
//! - [`scoring`]: points, streaks, speed bonus and ticket rewards
//! - [`rng`]: seeded LCG used for item draws, slot picks and jitter
//! - [`snapshot`]: read-only round view for presentation
//!
//! # Example
//!
//! ```
//! use whack_a_braille_core::{RoundEngine, RoundParams, RoundEffect};
//! use whack_a_braille_core::types::{Attempt, Difficulty, SpeechOutcome, TICK_MS};
//!
//! let mut engine = RoundEngine::new(12345);
//! assert!(engine.start(RoundParams::new("grade1Letters", Difficulty::Normal, 30_000)));
//!
//! // Advance until the first mole is announced.
//! while engine.active_mole_id().is_none() {
//!     engine.tick(TICK_MS);
//! }
//! let mole = engine.active_mole_id();
//! engine.announcement_settled(mole, SpeechOutcome::started_after(20));
//!
//! // Whack it with the matching chord.
//! let item = engine.active_item().unwrap();
//! engine.handle_attempt(Attempt::chord(item.dot_mask, mole));
//! assert_eq!(engine.score(), 10);
//!
//! engine.stop(true);
//! let ended = engine
//!     .take_effects()
//!     .into_iter()
//!     .any(|e| matches!(e, RoundEffect::RoundEnded(_)));
//! assert!(ended);
//! ```
//!
//! # Timing
//!
//! The host calls [`RoundEngine::tick`](round::RoundEngine::tick) every frame
//! (16ms) with the elapsed time. Due deadlines fire in order, then attempts
//! queued on the input sink are resolved.

pub mod effects;
pub mod registry;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod snapshot;
pub mod timing;

pub use whack_a_braille_types as types;

// Re-export commonly used types for convenience
pub use effects::{AttemptSink, RoundEffect};
pub use registry::{items_for_mode, mode_requires_perkins, BrailleItem, BrailleMode, CATALOG};
pub use rng::SimpleRng;
pub use round::{EngineConfig, RoundEngine, RoundParams, RoundPhase};
pub use scoring::{calculate_hit_score, ticket_breakdown, tickets_for_score, HitScore};
pub use snapshot::RoundSnapshot;
