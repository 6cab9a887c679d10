//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the game. All
//! types are plain data with no I/O, so they can be shared by the round
//! engine, the input resolver, the speech runtime and the terminal front-end.
//!
//! # Board
//!
//! The board always has [`SLOT_COUNT`] holes. A round draws at most that many
//! braille items, one per hole.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval of the host loop |
//! | `START_INTERVAL_MS` | 900 | Gap between moles at round start |
//! | `END_INTERVAL_MS` | 300 | Gap between moles at round end |
//! | `START_UP_TIME_MS` | 650 | Base visible time at round start |
//! | `END_UP_TIME_MS` | 250 | Base visible time at round end |
//! | `MIN_INTERVAL_MS` | 180 | Floor for the gap, after the difficulty multiplier |
//! | `REACTION_BUFFER_MS` | 260 | Added to every mole window |
//! | `MIN_WINDOW_MS` / `MAX_WINDOW_MS` | 400 / 1800 | Window clamp |
//! | `ANNOUNCE_TIMEOUT_MS` | 350 | Bound on waiting for speech to start |
//! | `ROUND_END_GRACE_MS` | 350 | Grace after the round clock expires |
//! | `CHORD_SETTLE_MS` | 30 | Release jitter absorbed before a chord resolves |
//!
//! # Scoring
//!
//! - +10 per hit, +10 more on every 5th consecutive hit (a streak bonus)
//! - -2 for the first miss on a mole, floored at zero
//! - A hit within 55% of the mole window is "fast"; every 3rd fast hit earns
//!   a speed ticket, at most 5 per round
//!
//! # Examples
//!
//! ```
//! use whack_a_braille_types::{Difficulty, InputMode, SLOT_COUNT};
//!
//! assert_eq!(SLOT_COUNT, 5);
//! assert_eq!(InputMode::from_str("Perkins"), Some(InputMode::Perkins));
//! assert_eq!(Difficulty::from_str("supreme"), Some(Difficulty::Supreme));
//! assert!(Difficulty::Training.is_training());
//! ```

use serde::{Deserialize, Serialize};

/// Number of mole holes on the board.
pub const SLOT_COUNT: usize = 5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Inter-mole gap at the start of a round.
pub const START_INTERVAL_MS: u32 = 900;

/// Inter-mole gap at the end of a round.
pub const END_INTERVAL_MS: u32 = 300;

/// Random jitter added to every inter-mole gap, `[0, INTERVAL_JITTER_MS)`.
pub const INTERVAL_JITTER_MS: u32 = 120;

/// Inter-mole gap floor, applied after the difficulty multiplier.
pub const MIN_INTERVAL_MS: u32 = 180;

/// Base visible time at the start of a round.
pub const START_UP_TIME_MS: u32 = 650;

/// Base visible time at the end of a round.
pub const END_UP_TIME_MS: u32 = 250;

/// Rounds at least this long ramp faster than wall-clock-linear.
pub const LONG_ROUND_MS: u32 = 45_000;

/// Base window scale reached at the very end of a long round (percent).
pub const LONG_ROUND_END_SCALE_PERCENT: u32 = 85;

/// Reaction buffer added to every mole window.
pub const REACTION_BUFFER_MS: u32 = 260;

/// Mole window floor.
pub const MIN_WINDOW_MS: u32 = 400;

/// Mole window ceiling.
pub const MAX_WINDOW_MS: u32 = 1800;

/// Pad used when speech never confirmed starting.
pub const SPEECH_NO_START_PAD_MS: u32 = 300;

/// Pad used when the announcement timed out waiting for a start.
pub const SPEECH_TIMEOUT_PAD_MS: u32 = 150;

/// Upper bound on waiting for an announcement to settle.
pub const ANNOUNCE_TIMEOUT_MS: u32 = 350;

/// Grace window between the round clock expiring and the round closing.
pub const ROUND_END_GRACE_MS: u32 = 350;

/// Points per hit.
pub const HIT_POINTS: u32 = 10;

/// A streak bonus is awarded on every Nth consecutive hit.
pub const STREAK_BONUS_EVERY: u32 = 5;

/// Points added by a streak bonus.
pub const STREAK_BONUS_POINTS: u32 = 10;

/// Points lost on the first miss against a mole.
pub const MISS_PENALTY: u32 = 2;

/// A hit is fast if its reaction time is at most this share of the window.
pub const SPEED_BONUS_THRESHOLD_PERCENT: u32 = 55;

/// One speed ticket per this many fast hits.
pub const SPEED_BONUS_EVERY: u32 = 3;

/// Speed tickets are capped per round.
pub const SPEED_BONUS_CAP: u32 = 5;

/// Completed moles that finish a training round.
pub const TRAINING_MOLE_CAP: u32 = 20;

/// Minimum spacing between miss cues in training.
pub const TRAINING_MISS_CUE_COOLDOWN_MS: u32 = 200;

/// Release jitter absorbed before a Perkins chord is resolved.
pub const CHORD_SETTLE_MS: u32 = 30;

/// Terminals without key-release events auto-release keys after this long.
pub const KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Lead-in between the opening announcement and the first round.
pub const ROUND_LEAD_IN_MS: u32 = 650;

/// Perkins keys in dot order: dot 1 → `f`, 2 → `d`, 3 → `s`, 4 → `j`, 5 → `k`, 6 → `l`.
pub const PERKINS_KEYS: [char; 6] = ['f', 'd', 's', 'j', 'k', 'l'];

/// Map a Perkins key (case-insensitive) to its braille dot number (1-6).
///
/// # Examples
///
/// ```
/// use whack_a_braille_types::perkins_key_dot;
///
/// assert_eq!(perkins_key_dot('f'), Some(1));
/// assert_eq!(perkins_key_dot('L'), Some(6));
/// assert_eq!(perkins_key_dot('a'), None);
/// ```
pub fn perkins_key_dot(key: char) -> Option<u8> {
    let key = key.to_ascii_lowercase();
    PERKINS_KEYS
        .iter()
        .position(|&k| k == key)
        .map(|i| (i as u8) + 1)
}

/// Score tiers mapping to base tickets, highest first.
pub const TICKET_TIERS: [(u32, u32); 4] = [(200, 20), (150, 15), (100, 10), (50, 5)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults() {
        assert_eq!(START_INTERVAL_MS, 900);
        assert_eq!(END_INTERVAL_MS, 300);
        assert_eq!(START_UP_TIME_MS, 650);
        assert_eq!(END_UP_TIME_MS, 250);
        assert_eq!(REACTION_BUFFER_MS, 260);
        assert_eq!(MIN_WINDOW_MS, 400);
        assert_eq!(MAX_WINDOW_MS, 1800);
        assert_eq!(ANNOUNCE_TIMEOUT_MS, 350);
        assert_eq!(ROUND_END_GRACE_MS, 350);
    }

    #[test]
    fn test_ticket_tiers_are_descending() {
        for pair in TICKET_TIERS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
            assert!(pair[0].1 > pair[1].1);
        }
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = RoundSummary {
            mode_id: "grade1Letters".to_string(),
            input_mode: InputMode::Qwerty,
            difficulty: Difficulty::Normal,
            duration_ms: 30_000,
            is_training: false,
            end_reason: EndReason::TimeUp,
            score: 60,
            hits: 5,
            misses: 0,
            escapes: 1,
            streak_bonus_count: 1,
            tickets: TicketBreakdown::new(5, 1, 0),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"modeId\":\"grade1Letters\""));
        assert!(json.contains("\"inputMode\":\"qwerty\""));
        assert!(json.contains("\"streakBonusCount\":1"));
        assert!(json.contains("\"total\":6"));
    }
}

/// Round-local mole identity.
///
/// Incremented every time a new mole is shown. `MoleId::NONE` (0) means no
/// mole has been published yet; attempts stamped with it never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MoleId(pub u32);

impl MoleId {
    pub const NONE: MoleId = MoleId(0);

    pub fn next(self) -> Self {
        MoleId(self.0.wrapping_add(1).max(1))
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// How the player is expected to type targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// One QWERTY key per target.
    #[default]
    Qwerty,
    /// Six-key chorded braille entry (f d s j k l).
    Perkins,
}

impl InputMode {
    /// Parse input mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "qwerty" | "standard" => Some(InputMode::Qwerty),
            "perkins" => Some(InputMode::Perkins),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Qwerty => "qwerty",
            InputMode::Perkins => "perkins",
        }
    }
}

/// Difficulty level.
///
/// Each level scales both the inter-mole gap and the mole up-time.
/// `Training` additionally disables scoring and ends after a mole count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Normal,
    Expert,
    Supreme,
    Training,
}

impl Difficulty {
    /// Parse difficulty from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use whack_a_braille_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("Beginner"), Some(Difficulty::Beginner));
    /// assert_eq!(Difficulty::from_str("training"), Some(Difficulty::Training));
    /// assert_eq!(Difficulty::from_str("nightmare"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "normal" => Some(Difficulty::Normal),
            "expert" => Some(Difficulty::Expert),
            "supreme" => Some(Difficulty::Supreme),
            "training" => Some(Difficulty::Training),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Normal => "normal",
            Difficulty::Expert => "expert",
            Difficulty::Supreme => "supreme",
            Difficulty::Training => "training",
        }
    }

    /// Timing multiplier applied to both the inter-mole gap and the up-time.
    pub fn timing_multiplier(&self) -> f32 {
        match self {
            Difficulty::Beginner | Difficulty::Training => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Expert => 0.75,
            Difficulty::Supreme => 0.5,
        }
    }

    pub fn is_training(&self) -> bool {
        matches!(self, Difficulty::Training)
    }
}

/// Which physical input style produced an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Chord,
    SingleKey,
    CommittedChar,
}

/// Matching payload of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptKind {
    /// Resolved Perkins chord (bit 0 = dot 1 … bit 5 = dot 6).
    Chord { dot_mask: u8 },
    /// A discrete key press.
    SingleKey(char),
    /// One character of atomically committed text.
    CommittedChar(char),
}

/// A normalized player attempt.
///
/// `mole_id` is the mole that was active when the physical input began, not
/// when the attempt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attempt {
    pub kind: AttemptKind,
    pub mole_id: MoleId,
}

impl Attempt {
    pub fn chord(dot_mask: u8, mole_id: MoleId) -> Self {
        Self {
            kind: AttemptKind::Chord { dot_mask },
            mole_id,
        }
    }

    pub fn single_key(key: char, mole_id: MoleId) -> Self {
        Self {
            kind: AttemptKind::SingleKey(key),
            mole_id,
        }
    }

    pub fn committed_char(ch: char, mole_id: MoleId) -> Self {
        Self {
            kind: AttemptKind::CommittedChar(ch),
            mole_id,
        }
    }

    pub fn modality(&self) -> Modality {
        match self.kind {
            AttemptKind::Chord { .. } => Modality::Chord,
            AttemptKind::SingleKey(_) => Modality::SingleKey,
            AttemptKind::CommittedChar(_) => Modality::CommittedChar,
        }
    }
}

/// When an announcement counts as settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    /// Settle as soon as speech confirms it started.
    #[default]
    OnStart,
    /// Settle once speech finished.
    OnEnd,
}

/// A request to speak text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRequest {
    /// Mole the announcement belongs to (`None` for non-mole speech).
    pub mole_id: Option<MoleId>,
    pub text: String,
    pub completion: CompletionMode,
    pub timeout_ms: u32,
    pub cancel_previous: bool,
}

impl AnnounceRequest {
    pub fn for_mole(mole_id: MoleId, text: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            mole_id: Some(mole_id),
            text: text.into(),
            completion: CompletionMode::OnStart,
            timeout_ms,
            cancel_previous: true,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            mole_id: None,
            text: text.into(),
            completion: CompletionMode::OnStart,
            timeout_ms: ANNOUNCE_TIMEOUT_MS,
            cancel_previous: true,
        }
    }
}

/// Telemetry returned once an announcement settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechOutcome {
    pub started: bool,
    pub ended: bool,
    pub timed_out: bool,
    /// No speech backend is available.
    pub unsupported: bool,
    /// Time between the request and speech confirming it started.
    pub start_delay_ms: Option<u32>,
}

impl SpeechOutcome {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    pub fn started_after(delay_ms: u32) -> Self {
        Self {
            started: true,
            start_delay_ms: Some(delay_ms),
            ..Self::default()
        }
    }

    pub fn finished(start_delay_ms: u32) -> Self {
        Self {
            started: true,
            ended: true,
            start_delay_ms: Some(start_delay_ms),
            ..Self::default()
        }
    }
}

/// Fire-and-forget audio feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Hit { score: Option<u32>, slot: usize },
    Miss { slot: Option<usize> },
    Pop { slot: usize },
    Escape { slot: usize },
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    /// Round clock and grace window elapsed.
    TimeUp,
    /// Training mole cap reached.
    TrainingComplete,
    /// Explicit stop by the host.
    Stopped,
    /// The mode had no items to play.
    NoItems,
}

/// Tickets earned in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBreakdown {
    pub base: u32,
    pub streak_bonus: u32,
    pub speed_bonus: u32,
    pub total: u32,
}

impl TicketBreakdown {
    pub fn new(base: u32, streak_bonus: u32, speed_bonus: u32) -> Self {
        Self {
            base,
            streak_bonus,
            speed_bonus,
            total: base + streak_bonus + speed_bonus,
        }
    }
}

/// Terminal event emitted exactly once per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub mode_id: String,
    pub input_mode: InputMode,
    pub difficulty: Difficulty,
    pub duration_ms: u32,
    pub is_training: bool,
    pub end_reason: EndReason,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub escapes: u32,
    pub streak_bonus_count: u32,
    pub tickets: TicketBreakdown,
}
