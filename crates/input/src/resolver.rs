//! Attempt resolution for terminal environments.
//!
//! Normalizes three input styles into [`Attempt`]s sent to a single sink:
//!
//! - **Perkins chords**: `f d s j k l` are tracked as held/used dot masks. The
//!   chord resolves once every key is released and a short settle delay has
//!   passed; a key pressed inside the settle window joins the same chord.
//! - **Single keys**: captured on key-down with the mole id of that instant
//!   and emitted on key-up, still carrying the key-down mole id.
//! - **Committed text**: split into non-space characters, all tagged with the
//!   mole id current when the text arrived.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use arrayvec::ArrayVec;
use tokio::sync::mpsc;

use crate::types::{
    perkins_key_dot, Attempt, InputMode, MoleId, CHORD_SETTLE_MS, KEY_RELEASE_TIMEOUT_MS,
};

/// Where resolved attempts go. Owned by the round engine's receiver.
pub type AttemptSink = mpsc::UnboundedSender<Attempt>;

/// Whether the host should suppress default handling of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Captured,
    Ignored,
}

impl KeyDisposition {
    pub fn is_captured(self) -> bool {
        self == KeyDisposition::Captured
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingKey {
    key: char,
    mole_id: MoleId,
    last_seen_ms: u64,
}

/// Most single keys that can be held at once.
const MAX_PENDING_KEYS: usize = 8;

#[derive(Debug)]
pub struct InputResolver {
    sink: Option<AttemptSink>,
    mode: InputMode,
    active_mole: MoleId,
    clock_ms: u64,
    // Chord state, bit n-1 = dot n.
    held: u8,
    used: u8,
    chord_owner: MoleId,
    chord_seen_ms: [u64; 6],
    settle_at: Option<u64>,
    pending: ArrayVec<PendingKey, MAX_PENDING_KEYS>,
    settle_ms: u32,
    key_release_timeout_ms: u32,
    /// The terminal reports key releases, so no auto-release is needed.
    release_events: bool,
    emitted: u32,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::with_config(CHORD_SETTLE_MS, KEY_RELEASE_TIMEOUT_MS)
    }

    pub fn with_config(settle_ms: u32, key_release_timeout_ms: u32) -> Self {
        Self {
            sink: None,
            mode: InputMode::Qwerty,
            active_mole: MoleId::NONE,
            clock_ms: 0,
            held: 0,
            used: 0,
            chord_owner: MoleId::NONE,
            chord_seen_ms: [0; 6],
            settle_at: None,
            pending: ArrayVec::new(),
            settle_ms,
            key_release_timeout_ms,
            release_events: false,
            emitted: 0,
        }
    }

    pub fn with_release_events(mut self, enabled: bool) -> Self {
        self.release_events = enabled;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn active_mole_id(&self) -> MoleId {
        self.active_mole
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Attempts sent so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Dot mask of the chord in progress (0 when none).
    pub fn chord_in_progress(&self) -> u8 {
        self.used
    }

    /// Register (or clear) the single attempt consumer. Drops in-flight input.
    pub fn set_attempt_sink(&mut self, sink: Option<AttemptSink>) {
        self.sink = sink;
        self.reset();
    }

    pub fn publish_active_mole_id(&mut self, mole_id: MoleId) {
        self.active_mole = mole_id;
    }

    /// Switch input style. Any partial chord or held key is discarded.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn key_down(&mut self, key: char) -> KeyDisposition {
        if self.sink.is_none() || key.is_control() {
            return KeyDisposition::Ignored;
        }

        if self.mode == InputMode::Perkins {
            if let Some(dot) = perkins_key_dot(key) {
                let bit = 1u8 << (dot - 1);
                if self.held == 0 && self.used == 0 {
                    self.chord_owner = self.active_mole;
                }
                // Pressed while settling: joins the chord.
                self.settle_at = None;
                self.held |= bit;
                self.used |= bit;
                self.chord_seen_ms[(dot - 1) as usize] = self.clock_ms;
                return KeyDisposition::Captured;
            }
        }

        if let Some(pending) = self
            .pending
            .iter_mut()
            .find(|p| p.key.eq_ignore_ascii_case(&key))
        {
            // Auto-repeat of a held key.
            pending.last_seen_ms = self.clock_ms;
            return KeyDisposition::Captured;
        }
        let pending = PendingKey {
            key,
            mole_id: self.active_mole,
            last_seen_ms: self.clock_ms,
        };
        if self.pending.try_push(pending).is_err() {
            return KeyDisposition::Ignored;
        }
        KeyDisposition::Captured
    }

    pub fn key_up(&mut self, key: char) -> KeyDisposition {
        if self.sink.is_none() {
            return KeyDisposition::Ignored;
        }

        if self.mode == InputMode::Perkins {
            if let Some(dot) = perkins_key_dot(key) {
                let bit = 1u8 << (dot - 1);
                if self.held & bit == 0 {
                    return KeyDisposition::Ignored;
                }
                self.release_dot(bit);
                return KeyDisposition::Captured;
            }
        }

        let Some(index) = self
            .pending
            .iter()
            .position(|p| p.key.eq_ignore_ascii_case(&key))
        else {
            return KeyDisposition::Ignored;
        };
        let pending = self.pending.remove(index);
        self.emit(Attempt::single_key(pending.key, pending.mole_id));
        KeyDisposition::Captured
    }

    /// Text delivered atomically, e.g. a braille display commit or paste.
    pub fn commit_text(&mut self, text: &str) -> KeyDisposition {
        if self.sink.is_none() {
            return KeyDisposition::Ignored;
        }
        let mole_id = self.active_mole;
        let mut any = false;
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            self.emit(Attempt::committed_char(ch, mole_id));
            any = true;
        }
        if any {
            KeyDisposition::Captured
        } else {
            KeyDisposition::Ignored
        }
    }

    /// Advance time: auto-release stale keys and resolve a settled chord.
    pub fn update(&mut self, elapsed_ms: u32) {
        self.clock_ms += elapsed_ms as u64;

        if !self.release_events {
            let timeout = self.key_release_timeout_ms as u64;
            for dot in 0..6u8 {
                let bit = 1u8 << dot;
                if self.held & bit != 0
                    && self.clock_ms - self.chord_seen_ms[dot as usize] > timeout
                {
                    self.release_dot(bit);
                }
            }

            while let Some(index) = self
                .pending
                .iter()
                .position(|p| self.clock_ms - p.last_seen_ms > timeout)
            {
                let pending = self.pending.remove(index);
                self.emit(Attempt::single_key(pending.key, pending.mole_id));
            }
        }

        if self.settle_at.is_some_and(|at| at <= self.clock_ms) {
            let mask = self.used;
            let owner = self.chord_owner;
            self.clear_chord();
            self.emit(Attempt::chord(mask, owner));
        }
    }

    fn release_dot(&mut self, bit: u8) {
        self.held &= !bit;
        if self.held == 0 && self.used != 0 {
            self.settle_at = Some(self.clock_ms + self.settle_ms as u64);
        }
    }

    fn clear_chord(&mut self) {
        self.held = 0;
        self.used = 0;
        self.chord_owner = MoleId::NONE;
        self.settle_at = None;
    }

    fn reset(&mut self) {
        self.clear_chord();
        self.pending.clear();
    }

    fn emit(&mut self, attempt: Attempt) {
        let Some(sink) = &self.sink else {
            return;
        };
        if sink.send(attempt).is_err() {
            // Consumer went away; behave as detached.
            self.sink = None;
            self.reset();
            return;
        }
        self.emitted = self.emitted.wrapping_add(1);
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}
