//! Routes engine effects to the terminal host's collaborators.
//!
//! Input effects go to the [`InputResolver`], speech effects to an
//! [`Announcer`], and everything visual lands in [`HostState`] for the view.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::core::RoundEffect;
use crate::input::InputResolver;
use crate::speech::{SpeechReport, SpeechRuntime};
use crate::term::HudView;
use crate::types::{AnnounceRequest, AudioCue, RoundSummary, SpeechOutcome};

/// How long a hit hole stays highlighted.
pub const HIT_FLASH_MS: u32 = 250;

/// Speech collaborator as seen by the host loop.
pub trait Announcer {
    fn announce(&mut self, request: AnnounceRequest);
    fn cancel(&mut self);
    /// Next settled announcement, if any.
    fn poll_report(&mut self) -> Option<SpeechReport>;
    fn is_enabled(&self) -> bool {
        true
    }
}

impl Announcer for SpeechRuntime {
    fn announce(&mut self, request: AnnounceRequest) {
        SpeechRuntime::announce(self, request);
    }

    fn cancel(&mut self) {
        SpeechRuntime::cancel(self);
    }

    fn poll_report(&mut self) -> Option<SpeechReport> {
        self.try_recv()
    }
}

/// Stand-in when speech is disabled: every announcement settles at once as
/// unsupported, so moles appear without waiting for the announce timeout.
#[derive(Debug, Default)]
pub struct MutedSpeech {
    reports: VecDeque<SpeechReport>,
}

impl Announcer for MutedSpeech {
    fn announce(&mut self, request: AnnounceRequest) {
        self.reports.push_back(SpeechReport {
            mole_id: request.mole_id,
            outcome: SpeechOutcome::unsupported(),
        });
    }

    fn cancel(&mut self) {}

    fn poll_report(&mut self) -> Option<SpeechReport> {
        self.reports.pop_front()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Presentation state the engine does not own.
#[derive(Debug, Default)]
pub struct HostState {
    status: String,
    hit_flash: Option<(usize, u32)>,
    finished: Option<RoundSummary>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, text: &str) {
        self.status.clear();
        self.status.push_str(text);
    }

    pub fn hit_slot(&self) -> Option<usize> {
        self.hit_flash.map(|(slot, _)| slot)
    }

    /// Summary of the round that just ended, handed out once.
    pub fn take_finished(&mut self) -> Option<RoundSummary> {
        self.finished.take()
    }

    /// Age the hit flash.
    pub fn update(&mut self, elapsed_ms: u32) {
        if let Some((slot, left)) = self.hit_flash {
            let left = left.saturating_sub(elapsed_ms);
            self.hit_flash = (left > 0).then_some((slot, left));
        }
    }

    pub fn hud(&self, speech_enabled: bool) -> HudView<'_> {
        HudView {
            status: &self.status,
            hit_slot: self.hit_slot(),
            speech_enabled,
        }
    }

    /// Apply effects in order.
    pub fn apply(
        &mut self,
        effects: Vec<RoundEffect>,
        resolver: &mut InputResolver,
        speech: &mut dyn Announcer,
    ) {
        for effect in effects {
            trace!(effect = effect.name(), "effect");
            match effect {
                RoundEffect::AttachInput(sink) => resolver.set_attempt_sink(Some(sink)),
                RoundEffect::DetachInput => resolver.set_attempt_sink(None),
                RoundEffect::PublishMoleId(id) => resolver.publish_active_mole_id(id),
                RoundEffect::SetInputMode(mode) => resolver.set_input_mode(mode),
                RoundEffect::Announce(request) => {
                    self.set_status(&request.text);
                    speech.announce(request);
                }
                RoundEffect::CancelSpeech => speech.cancel(),
                // The view reads slot visibility from the snapshot.
                RoundEffect::ActivateSlot(_) | RoundEffect::DeactivateSlot(_) => {}
                RoundEffect::MarkHit(slot) => self.hit_flash = Some((slot, HIT_FLASH_MS)),
                RoundEffect::Cue(cue) => self.cue(cue),
                RoundEffect::ScoreChanged { .. } => {}
                RoundEffect::RoundEnded(summary) => {
                    debug!(
                        reason = ?summary.end_reason,
                        score = summary.score,
                        tickets = summary.tickets.total,
                        "round ended"
                    );
                    self.hit_flash = None;
                    self.finished = Some(summary);
                }
            }
        }
    }

    fn cue(&mut self, cue: AudioCue) {
        trace!(?cue, "cue");
        match cue {
            AudioCue::Miss { .. } => self.set_status("Miss!"),
            AudioCue::Escape { .. } => self.set_status("Escaped!"),
            AudioCue::Hit { .. } | AudioCue::Pop { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnounceRequest, InputMode, MoleId, ANNOUNCE_TIMEOUT_MS};

    #[derive(Default)]
    struct Recorder {
        spoken: Vec<String>,
        cancels: u32,
    }

    impl Announcer for Recorder {
        fn announce(&mut self, request: AnnounceRequest) {
            self.spoken.push(request.text);
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }

        fn poll_report(&mut self) -> Option<SpeechReport> {
            None
        }
    }

    #[test]
    fn test_routes_speech_and_status() {
        let mut host = HostState::new();
        let mut resolver = InputResolver::new();
        let mut speech = Recorder::default();

        host.apply(
            vec![
                RoundEffect::Announce(AnnounceRequest::for_mole(
                    MoleId(1),
                    "a",
                    ANNOUNCE_TIMEOUT_MS,
                )),
                RoundEffect::CancelSpeech,
            ],
            &mut resolver,
            &mut speech,
        );
        assert_eq!(speech.spoken, vec!["a"]);
        assert_eq!(speech.cancels, 1);
        assert_eq!(host.status(), "a");
    }

    #[test]
    fn test_routes_input_effects() {
        let mut host = HostState::new();
        let mut resolver = InputResolver::new();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        host.apply(
            vec![
                RoundEffect::SetInputMode(InputMode::Perkins),
                RoundEffect::AttachInput(tx),
                RoundEffect::PublishMoleId(MoleId(7)),
            ],
            &mut resolver,
            &mut MutedSpeech::default(),
        );
        assert_eq!(resolver.mode(), InputMode::Perkins);
        assert!(resolver.has_sink());
        assert_eq!(resolver.active_mole_id(), MoleId(7));

        host.apply(
            vec![RoundEffect::DetachInput],
            &mut resolver,
            &mut MutedSpeech::default(),
        );
        assert!(!resolver.has_sink());
    }

    #[test]
    fn test_hit_flash_expires() {
        let mut host = HostState::new();
        host.apply(
            vec![RoundEffect::MarkHit(3)],
            &mut InputResolver::new(),
            &mut MutedSpeech::default(),
        );
        assert_eq!(host.hit_slot(), Some(3));
        host.update(HIT_FLASH_MS - 1);
        assert_eq!(host.hit_slot(), Some(3));
        host.update(1);
        assert_eq!(host.hit_slot(), None);
    }

    #[test]
    fn test_muted_speech_settles_immediately() {
        let mut speech = MutedSpeech::default();
        speech.announce(AnnounceRequest::for_mole(MoleId(4), "d", ANNOUNCE_TIMEOUT_MS));
        let report = speech.poll_report().unwrap();
        assert_eq!(report.mole_id, Some(MoleId(4)));
        assert!(report.outcome.unsupported);
        assert!(speech.poll_report().is_none());
    }
}
