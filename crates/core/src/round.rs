//! Round engine - owns the round lifecycle, mole cycle and attempt resolution
//!
//! The engine is a deterministic, fixed-timestep state machine. The host
//! advances it with [`RoundEngine::tick`] and feeds speech settlements back
//! with [`RoundEngine::announcement_settled`]. Everything the engine wants
//! done (speak, light a hole, play a cue) comes out as a [`RoundEffect`].
//!
//! Timers are deadlines on the engine's own clock. Within a tick, due
//! deadlines fire in chronological order before queued attempts are drained,
//! so an escape that lands in the same tick as an attempt for that mole wins.
//!
//! Every resumption point (timer, speech settlement, attempt) re-checks both
//! that the round is live and that its mole id is still the active one. A
//! mismatch is a silent no-op.

use arrayvec::ArrayVec;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::effects::{AttemptSource, RoundEffect};
use crate::registry::{items_for_mode, mode_requires_perkins, BrailleItem};
use crate::rng::SimpleRng;
use crate::scoring::{
    apply_miss_penalty, calculate_hit_score, earns_speed_ticket, is_fast_hit, ticket_breakdown,
};
use crate::snapshot::RoundSnapshot;
use crate::timing::{base_up_time_ms, mole_interval_ms, mole_window_ms, round_end_grace_ms};
use crate::types::*;

/// Tunables that are constants in normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub announce_timeout_ms: u32,
    pub round_end_grace_ms: u32,
    pub training_cap: u32,
    pub speed_threshold_percent: u32,
    pub speed_bonus_every: u32,
    pub speed_bonus_cap: u32,
    pub training_miss_cue_cooldown_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            announce_timeout_ms: ANNOUNCE_TIMEOUT_MS,
            round_end_grace_ms: ROUND_END_GRACE_MS,
            training_cap: TRAINING_MOLE_CAP,
            speed_threshold_percent: SPEED_BONUS_THRESHOLD_PERCENT,
            speed_bonus_every: SPEED_BONUS_EVERY,
            speed_bonus_cap: SPEED_BONUS_CAP,
            training_miss_cue_cooldown_ms: TRAINING_MISS_CUE_COOLDOWN_MS,
        }
    }
}

/// Parameters for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundParams {
    pub mode_id: String,
    pub input_mode: InputMode,
    pub difficulty: Difficulty,
    /// Ignored in training, which ends on a mole count instead.
    pub duration_ms: u32,
    /// Training only: append the dot numbers to each announcement.
    pub speak_braille_dots: bool,
}

impl RoundParams {
    pub fn new(mode_id: impl Into<String>, difficulty: Difficulty, duration_ms: u32) -> Self {
        Self {
            mode_id: mode_id.into(),
            input_mode: InputMode::Qwerty,
            difficulty,
            duration_ms,
            speak_braille_dots: false,
        }
    }

    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    pub fn with_braille_dots(mut self, enabled: bool) -> Self {
        self.speak_braille_dots = enabled;
        self
    }
}

impl Default for RoundParams {
    fn default() -> Self {
        Self::new("grade1Letters", Difficulty::Normal, 30_000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    Running,
    /// Clock expired; the current mole may still be hit during the grace window.
    Ending,
}

/// The mole currently attributable to input.
#[derive(Debug, Clone, Copy)]
struct ActiveMole {
    id: MoleId,
    slot: usize,
    item: &'static BrailleItem,
    /// Engine time the slot was visually activated; `None` while announcing.
    activated_at: Option<u64>,
    window_ms: u32,
    /// A scored miss was already charged against this mole.
    missed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Timer {
    // Declaration order breaks ties between deadlines at the same instant.
    Escape,
    AnnounceTimeout,
    NextMole,
    RoundEnd,
    Grace,
}

#[derive(Debug, Clone, Copy, Default)]
struct Timers {
    escape: Option<(MoleId, u64)>,
    announce_timeout: Option<(MoleId, u64)>,
    next_mole: Option<u64>,
    round_end: Option<u64>,
    grace: Option<u64>,
}

impl Timers {
    fn next_due(&self, until: u64) -> Option<(u64, Timer)> {
        [
            (self.escape.map(|(_, at)| at), Timer::Escape),
            (self.announce_timeout.map(|(_, at)| at), Timer::AnnounceTimeout),
            (self.next_mole, Timer::NextMole),
            (self.round_end, Timer::RoundEnd),
            (self.grace, Timer::Grace),
        ]
        .into_iter()
        .filter_map(|(at, timer)| at.filter(|&at| at <= until).map(|at| (at, timer)))
        .min()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    score: u32,
    streak: u32,
    hits: u32,
    misses: u32,
    escapes: u32,
    streak_bonus_count: u32,
    fast_hits: u32,
    speed_bonus_tickets: u32,
    training_completed: u32,
}

/// Single owned round engine. One round may be live at a time.
#[derive(Debug)]
pub struct RoundEngine {
    config: EngineConfig,
    rng: SimpleRng,
    phase: RoundPhase,
    /// Engine clock in milliseconds, advanced only by `tick`.
    now_ms: u64,
    round_started_at: u64,
    params: RoundParams,
    /// Effective input mode (forced to Perkins for some modes).
    input_mode: InputMode,
    round_items: ArrayVec<&'static BrailleItem, SLOT_COUNT>,
    /// Monotonic over the engine's lifetime, never reset between rounds.
    last_mole_id: MoleId,
    active: Option<ActiveMole>,
    previous_slot: Option<usize>,
    counters: Counters,
    last_miss_cue_at: Option<u64>,
    timers: Timers,
    attempts: Option<AttemptSource>,
    effects: Vec<RoundEffect>,
    rounds_played: u32,
    last_summary: Option<RoundSummary>,
}

impl RoundEngine {
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    pub fn with_config(seed: u32, config: EngineConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(seed),
            phase: RoundPhase::Idle,
            now_ms: 0,
            round_started_at: 0,
            params: RoundParams::default(),
            input_mode: InputMode::Qwerty,
            round_items: ArrayVec::new(),
            last_mole_id: MoleId::NONE,
            active: None,
            previous_slot: None,
            counters: Counters::default(),
            last_miss_cue_at: None,
            timers: Timers::default(),
            attempts: None,
            effects: Vec::with_capacity(16),
            rounds_played: 0,
            last_summary: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Running or in the end-of-round grace window.
    pub fn is_live(&self) -> bool {
        self.phase != RoundPhase::Idle
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn params(&self) -> &RoundParams {
        &self.params
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn round_items(&self) -> &[&'static BrailleItem] {
        &self.round_items
    }

    pub fn active_mole_id(&self) -> MoleId {
        self.active.map(|m| m.id).unwrap_or(MoleId::NONE)
    }

    pub fn last_mole_id(&self) -> MoleId {
        self.last_mole_id
    }

    pub fn active_slot(&self) -> Option<usize> {
        self.active.map(|m| m.slot)
    }

    pub fn active_item(&self) -> Option<&'static BrailleItem> {
        self.active.map(|m| m.item)
    }

    /// Whether the active mole's slot is visually up.
    pub fn is_slot_visible(&self) -> bool {
        self.active.is_some_and(|m| m.activated_at.is_some())
    }

    pub fn score(&self) -> u32 {
        self.counters.score
    }

    pub fn streak(&self) -> u32 {
        self.counters.streak
    }

    pub fn hits(&self) -> u32 {
        self.counters.hits
    }

    pub fn misses(&self) -> u32 {
        self.counters.misses
    }

    pub fn escapes(&self) -> u32 {
        self.counters.escapes
    }

    pub fn streak_bonus_count(&self) -> u32 {
        self.counters.streak_bonus_count
    }

    pub fn speed_bonus_tickets(&self) -> u32 {
        self.counters.speed_bonus_tickets
    }

    pub fn training_completed(&self) -> u32 {
        self.counters.training_completed
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    /// Milliseconds left on the round clock (`None` in training or when idle).
    pub fn remaining_ms(&self) -> Option<u32> {
        if !self.is_live() || self.params.difficulty.is_training() {
            return None;
        }
        let end = self.round_started_at + self.params.duration_ms as u64;
        Some(end.saturating_sub(self.now_ms).min(u32::MAX as u64) as u32)
    }

    /// Start a round. Returns `false` (and changes nothing) if one is live.
    pub fn start(&mut self, params: RoundParams) -> bool {
        if self.is_live() {
            trace!(mode = %params.mode_id, "start ignored: round already live");
            return false;
        }

        let pool = items_for_mode(&params.mode_id);
        self.input_mode = if mode_requires_perkins(&params.mode_id) {
            InputMode::Perkins
        } else {
            params.input_mode
        };
        self.round_items = self.rng.sample(&pool);
        self.params = params;
        self.counters = Counters::default();
        self.active = None;
        self.previous_slot = None;
        self.last_miss_cue_at = None;
        self.timers = Timers::default();
        self.round_started_at = self.now_ms;
        self.phase = RoundPhase::Running;
        self.rounds_played = self.rounds_played.wrapping_add(1);

        let (sink, source) = mpsc::unbounded_channel();
        self.attempts = Some(source);
        self.effects.push(RoundEffect::SetInputMode(self.input_mode));
        self.effects.push(RoundEffect::AttachInput(sink));
        self.push_score();

        debug!(
            mode = %self.params.mode_id,
            input_mode = self.input_mode.as_str(),
            difficulty = self.params.difficulty.as_str(),
            duration_ms = self.params.duration_ms,
            items = self.round_items.len(),
            "round started"
        );

        if self.round_items.is_empty() {
            debug!(mode = %self.params.mode_id, "no items for mode");
            self.finish(EndReason::NoItems, false);
            return true;
        }

        if !self.params.difficulty.is_training() {
            self.timers.round_end = Some(self.now_ms + self.params.duration_ms as u64);
        }
        self.schedule_next_mole();
        true
    }

    /// Stop the live round immediately. Returns `false` when idle.
    pub fn stop(&mut self, cancel_speech: bool) -> bool {
        if !self.is_live() {
            return false;
        }
        self.finish(EndReason::Stopped, cancel_speech);
        true
    }

    /// Advance the engine clock, fire due timers, then drain queued attempts.
    ///
    /// Returns true if any effect was produced.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_live() {
            return false;
        }
        let before = self.effects.len();
        let target = self.now_ms + elapsed_ms as u64;

        while let Some((at, timer)) = self.timers.next_due(target) {
            self.now_ms = at;
            self.fire(timer);
            if !self.is_live() {
                break;
            }
        }
        self.now_ms = target;
        self.pump_attempts();

        self.effects.len() != before
    }

    /// Resolve every attempt queued on the sink, in arrival order.
    pub fn pump_attempts(&mut self) {
        while let Some(attempt) = self.attempts.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.handle_attempt(attempt);
        }
    }

    /// Speech for `mole_id` settled (started, ended, timed out or failed).
    pub fn announcement_settled(&mut self, mole_id: MoleId, outcome: SpeechOutcome) {
        if !self.is_live() {
            trace!(mole = mole_id.0, "announcement settled after round end");
            return;
        }
        match self.active {
            Some(mole) if mole.id == mole_id && mole.activated_at.is_none() => {
                self.activate(outcome);
            }
            _ => trace!(mole = mole_id.0, "stale announcement settlement"),
        }
    }

    /// Spoken text for the active mole, for a "repeat target" request.
    pub fn current_speech_payload(&self) -> Option<String> {
        self.active.map(|m| self.announcement_text(m.item))
    }

    /// Resolve one attempt against the active mole.
    pub fn handle_attempt(&mut self, attempt: Attempt) {
        if !self.is_live() {
            trace!("attempt ignored: no live round");
            return;
        }
        let Some(mole) = self.active else {
            trace!("attempt ignored: no active mole");
            return;
        };
        if attempt.mole_id != mole.id {
            trace!(
                attempt = attempt.mole_id.0,
                active = mole.id.0,
                "stale attempt"
            );
            return;
        }
        if self.input_mode == InputMode::Perkins && attempt.modality() == Modality::SingleKey {
            return;
        }

        if attempt_matches(&attempt, mole.item) {
            self.on_hit(mole);
        } else {
            self.on_miss(mole);
        }
    }

    /// Drain effects produced since the last call.
    pub fn take_effects(&mut self) -> Vec<RoundEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    pub fn snapshot_into(&self, out: &mut RoundSnapshot) {
        out.phase = self.phase;
        out.mode_id.clear();
        out.mode_id.push_str(&self.params.mode_id);
        out.input_mode = self.input_mode;
        out.difficulty = self.params.difficulty;
        out.is_training = self.params.difficulty.is_training();
        out.mole_id = self.active_mole_id();
        out.active_slot = self.active_slot();
        out.slot_visible = self.is_slot_visible();
        out.slot_labels = [None; SLOT_COUNT];
        for (label, item) in out.slot_labels.iter_mut().zip(self.round_items.iter()) {
            *label = Some(item.display_label);
        }
        out.score = self.counters.score;
        out.streak = self.counters.streak;
        out.hits = self.counters.hits;
        out.misses = self.counters.misses;
        out.escapes = self.counters.escapes;
        out.streak_bonus_count = self.counters.streak_bonus_count;
        out.speed_bonus_tickets = self.counters.speed_bonus_tickets;
        out.training_completed = self.counters.training_completed;
        out.training_cap = self.config.training_cap;
        out.remaining_ms = self.remaining_ms();
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let mut snap = RoundSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn fire(&mut self, timer: Timer) {
        match timer {
            Timer::Escape => {
                if let Some((id, _)) = self.timers.escape.take() {
                    self.on_escape(id);
                }
            }
            Timer::AnnounceTimeout => {
                if let Some((id, _)) = self.timers.announce_timeout.take() {
                    if self.active.is_some_and(|m| m.id == id && m.activated_at.is_none()) {
                        trace!(mole = id.0, "announcement timed out");
                        self.activate(SpeechOutcome::timed_out());
                    }
                }
            }
            Timer::NextMole => {
                self.timers.next_mole = None;
                self.show_next_mole();
            }
            Timer::RoundEnd => {
                self.timers.round_end = None;
                self.begin_ending();
            }
            Timer::Grace => {
                self.timers.grace = None;
                self.finish(EndReason::TimeUp, true);
            }
        }
    }

    /// Raw round progress in `[0, 1]`.
    fn progress(&self) -> f32 {
        if self.params.difficulty.is_training() {
            if self.config.training_cap == 0 {
                return 1.0;
            }
            return self.counters.training_completed as f32 / self.config.training_cap as f32;
        }
        if self.params.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = self.now_ms.saturating_sub(self.round_started_at);
        (elapsed as f32 / self.params.duration_ms as f32).min(1.0)
    }

    fn ramp_duration(&self) -> Option<u32> {
        (!self.params.difficulty.is_training()).then_some(self.params.duration_ms)
    }

    fn schedule_next_mole(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        let jitter = self.rng.next_range(INTERVAL_JITTER_MS);
        let delay = mole_interval_ms(
            self.progress(),
            self.ramp_duration(),
            self.params.difficulty,
            jitter,
        );
        self.timers.next_mole = Some(self.now_ms + delay as u64);
    }

    fn show_next_mole(&mut self) {
        if self.phase != RoundPhase::Running || self.round_items.is_empty() {
            return;
        }
        if let Some(previous) = self.active.take() {
            // Normally cleared by hit/escape already.
            if previous.activated_at.is_some() {
                self.effects.push(RoundEffect::DeactivateSlot(previous.slot));
            }
        }

        let id = self.last_mole_id.next();
        self.last_mole_id = id;
        let slot = self
            .rng
            .pick_other(self.round_items.len(), self.previous_slot);
        let item = self.round_items[slot];
        self.previous_slot = Some(slot);
        self.active = Some(ActiveMole {
            id,
            slot,
            item,
            activated_at: None,
            window_ms: 0,
            missed: false,
        });
        self.timers.escape = None;
        self.timers.announce_timeout =
            Some((id, self.now_ms + self.config.announce_timeout_ms as u64));

        trace!(mole = id.0, slot, item = item.id, "mole picked");
        self.effects.push(RoundEffect::PublishMoleId(id));
        self.effects.push(RoundEffect::Announce(AnnounceRequest::for_mole(
            id,
            self.announcement_text(item),
            self.config.announce_timeout_ms,
        )));
    }

    fn announcement_text(&self, item: &BrailleItem) -> String {
        if !(self.params.difficulty.is_training() && self.params.speak_braille_dots) {
            return item.announce_text.to_string();
        }
        let dots = item
            .dots
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let noun = if item.dots.len() == 1 { "Dot" } else { "Dots" };
        format!("{}, {} {}", item.announce_text, noun, dots)
    }

    fn activate(&mut self, outcome: SpeechOutcome) {
        let base_up = base_up_time_ms(self.progress(), self.ramp_duration());
        let window = mole_window_ms(base_up, self.params.difficulty, &outcome);
        let Some(mole) = self.active.as_mut() else {
            return;
        };
        mole.activated_at = Some(self.now_ms);
        mole.window_ms = window;
        let (id, slot) = (mole.id, mole.slot);

        self.timers.announce_timeout = None;
        self.timers.escape = Some((id, self.now_ms + window as u64));
        trace!(mole = id.0, slot, window_ms = window, "mole up");
        self.effects.push(RoundEffect::ActivateSlot(slot));
        self.effects.push(RoundEffect::Cue(AudioCue::Pop { slot }));
    }

    fn on_escape(&mut self, id: MoleId) {
        let Some(mole) = self.active.filter(|m| m.id == id) else {
            trace!(mole = id.0, "stale escape timer");
            return;
        };
        self.active = None;
        self.counters.escapes += 1;
        self.counters.streak = 0;
        self.effects
            .push(RoundEffect::Cue(AudioCue::Escape { slot: mole.slot }));
        self.effects.push(RoundEffect::DeactivateSlot(mole.slot));
        if !self.params.difficulty.is_training() {
            self.push_score();
        }
        self.schedule_next_mole();
    }

    fn on_hit(&mut self, mole: ActiveMole) {
        self.active = None;
        self.timers.escape = None;
        self.timers.announce_timeout = None;
        self.counters.hits += 1;
        self.effects.push(RoundEffect::MarkHit(mole.slot));
        if mole.activated_at.is_some() {
            self.effects.push(RoundEffect::DeactivateSlot(mole.slot));
        }

        if self.params.difficulty.is_training() {
            self.counters.training_completed += 1;
            self.effects.push(RoundEffect::Cue(AudioCue::Hit {
                score: None,
                slot: mole.slot,
            }));
            if self.counters.training_completed >= self.config.training_cap {
                self.finish(EndReason::TrainingComplete, false);
            } else {
                self.schedule_next_mole();
            }
            return;
        }

        self.counters.streak += 1;
        let hit = calculate_hit_score(self.counters.streak);
        self.counters.score += hit.points;
        if hit.streak_bonus {
            self.counters.streak_bonus_count += 1;
        }

        if let Some(activated_at) = mole.activated_at {
            let reaction = self.now_ms.saturating_sub(activated_at).min(u32::MAX as u64) as u32;
            if is_fast_hit(reaction, mole.window_ms, self.config.speed_threshold_percent) {
                self.counters.fast_hits += 1;
                if earns_speed_ticket(
                    self.counters.fast_hits,
                    self.counters.speed_bonus_tickets,
                    self.config.speed_bonus_every,
                    self.config.speed_bonus_cap,
                ) {
                    self.counters.speed_bonus_tickets += 1;
                }
            }
        }

        self.effects.push(RoundEffect::Cue(AudioCue::Hit {
            score: Some(self.counters.score),
            slot: mole.slot,
        }));
        self.push_score();
        self.schedule_next_mole();
    }

    fn on_miss(&mut self, mole: ActiveMole) {
        if self.params.difficulty.is_training() {
            self.counters.misses += 1;
            let cooled_down = self.last_miss_cue_at.map_or(true, |at| {
                self.now_ms.saturating_sub(at) >= self.config.training_miss_cue_cooldown_ms as u64
            });
            if cooled_down {
                self.last_miss_cue_at = Some(self.now_ms);
                self.effects.push(RoundEffect::Cue(AudioCue::Miss {
                    slot: Some(mole.slot),
                }));
            }
            return;
        }

        if mole.missed {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.missed = true;
        }
        self.counters.misses += 1;
        self.counters.score = apply_miss_penalty(self.counters.score);
        self.counters.streak = 0;
        self.effects.push(RoundEffect::Cue(AudioCue::Miss {
            slot: Some(mole.slot),
        }));
        self.push_score();
    }

    fn begin_ending(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        self.phase = RoundPhase::Ending;
        self.timers.next_mole = None;
        self.timers.grace =
            Some(self.now_ms + round_end_grace_ms(Some(self.config.round_end_grace_ms)) as u64);
        debug!(mole = self.active_mole_id().0, "round clock expired");
    }

    fn finish(&mut self, reason: EndReason, cancel_speech: bool) {
        self.timers = Timers::default();
        if let Some(mole) = self.active.take() {
            if mole.activated_at.is_some() {
                self.effects.push(RoundEffect::DeactivateSlot(mole.slot));
            }
        }
        self.attempts = None;
        self.effects.push(RoundEffect::DetachInput);
        if cancel_speech {
            self.effects.push(RoundEffect::CancelSpeech);
        }
        self.phase = RoundPhase::Idle;

        let is_training = self.params.difficulty.is_training();
        let c = self.counters;
        let summary = RoundSummary {
            mode_id: self.params.mode_id.clone(),
            input_mode: self.input_mode,
            difficulty: self.params.difficulty,
            duration_ms: if is_training { 0 } else { self.params.duration_ms },
            is_training,
            end_reason: reason,
            score: if is_training { 0 } else { c.score },
            hits: c.hits,
            misses: c.misses,
            escapes: c.escapes,
            streak_bonus_count: if is_training { 0 } else { c.streak_bonus_count },
            tickets: ticket_breakdown(
                c.score,
                c.streak_bonus_count,
                c.speed_bonus_tickets,
                is_training,
            ),
        };
        debug!(
            reason = ?reason,
            score = summary.score,
            hits = summary.hits,
            misses = summary.misses,
            escapes = summary.escapes,
            tickets = summary.tickets.total,
            "round ended"
        );
        self.last_summary = Some(summary.clone());
        self.effects.push(RoundEffect::RoundEnded(summary));
    }

    fn push_score(&mut self) {
        self.effects.push(RoundEffect::ScoreChanged {
            score: self.counters.score,
            streak: self.counters.streak,
        });
    }
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Exact matching rules per modality.
fn attempt_matches(attempt: &Attempt, item: &BrailleItem) -> bool {
    match attempt.kind {
        AttemptKind::Chord { dot_mask } => dot_mask == item.dot_mask,
        AttemptKind::SingleKey(key) => item
            .standard_key
            .is_some_and(|k| k.to_lowercase().eq(key.to_lowercase())),
        AttemptKind::CommittedChar(ch) => {
            let mut id = item.id.chars();
            match (id.next(), id.next()) {
                (Some(first), None) => first.to_lowercase().eq(ch.to_lowercase()),
                _ => false,
            }
        }
    }
}
