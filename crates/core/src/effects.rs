//! Effects emitted by the round engine for its collaborators
//!
//! The engine never calls into speech, audio, presentation or input directly.
//! It appends [`RoundEffect`]s to an outbox in the order they happen, and the
//! host drains them with [`RoundEngine::take_effects`](crate::RoundEngine::take_effects)
//! once per frame.

use tokio::sync::mpsc;

use crate::types::{AnnounceRequest, Attempt, AudioCue, InputMode, MoleId, RoundSummary};

/// Channel end handed to input resolution while a round is live.
pub type AttemptSink = mpsc::UnboundedSender<Attempt>;

/// Receiving end kept by the engine.
pub type AttemptSource = mpsc::UnboundedReceiver<Attempt>;

#[derive(Debug, Clone)]
pub enum RoundEffect {
    /// Register the sink as the single attempt consumer.
    AttachInput(AttemptSink),
    /// Clear the attempt consumer.
    DetachInput,
    /// Input started after this point belongs to this mole.
    PublishMoleId(MoleId),
    SetInputMode(InputMode),
    Announce(AnnounceRequest),
    /// Best-effort; the engine does not wait for it.
    CancelSpeech,
    ActivateSlot(usize),
    DeactivateSlot(usize),
    MarkHit(usize),
    Cue(AudioCue),
    ScoreChanged { score: u32, streak: u32 },
    /// Emitted exactly once per started round, always last for that round.
    RoundEnded(RoundSummary),
}

impl RoundEffect {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RoundEffect::AttachInput(_) => "attach_input",
            RoundEffect::DetachInput => "detach_input",
            RoundEffect::PublishMoleId(_) => "publish_mole_id",
            RoundEffect::SetInputMode(_) => "set_input_mode",
            RoundEffect::Announce(_) => "announce",
            RoundEffect::CancelSpeech => "cancel_speech",
            RoundEffect::ActivateSlot(_) => "activate_slot",
            RoundEffect::DeactivateSlot(_) => "deactivate_slot",
            RoundEffect::MarkHit(_) => "mark_hit",
            RoundEffect::Cue(_) => "cue",
            RoundEffect::ScoreChanged { .. } => "score_changed",
            RoundEffect::RoundEnded(_) => "round_ended",
        }
    }
}
