use crate::round::RoundPhase;
use crate::types::{Difficulty, InputMode, MoleId, SLOT_COUNT};

/// Read-only view of a round for presentation.
///
/// Filled by [`RoundEngine::snapshot_into`](crate::RoundEngine::snapshot_into)
/// so the host can reuse one instance across frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub mode_id: String,
    pub input_mode: InputMode,
    pub difficulty: Difficulty,
    pub is_training: bool,
    pub mole_id: MoleId,
    pub active_slot: Option<usize>,
    /// The active slot is visually up (announcement settled).
    pub slot_visible: bool,
    /// Display label per hole; `None` for holes without an item.
    pub slot_labels: [Option<&'static str>; SLOT_COUNT],
    pub score: u32,
    pub streak: u32,
    pub hits: u32,
    pub misses: u32,
    pub escapes: u32,
    pub streak_bonus_count: u32,
    pub speed_bonus_tickets: u32,
    pub training_completed: u32,
    pub training_cap: u32,
    pub remaining_ms: Option<u32>,
}

impl RoundSnapshot {
    pub fn clear(&mut self) {
        // Keep the string allocation for reuse.
        let mut mode_id = std::mem::take(&mut self.mode_id);
        mode_id.clear();
        *self = Self {
            mode_id,
            ..Self::default()
        };
    }

    pub fn is_live(&self) -> bool {
        self.phase != RoundPhase::Idle
    }

    /// Label of the hole that is currently up, if any.
    pub fn visible_label(&self) -> Option<&'static str> {
        if !self.slot_visible {
            return None;
        }
        self.active_slot
            .and_then(|slot| self.slot_labels.get(slot).copied().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_fields() {
        let mut snap = RoundSnapshot {
            phase: RoundPhase::Running,
            mode_id: "grade1Letters".to_string(),
            score: 40,
            active_slot: Some(2),
            ..RoundSnapshot::default()
        };
        snap.clear();
        assert_eq!(snap, RoundSnapshot::default());
    }

    #[test]
    fn test_visible_label_requires_activation() {
        let mut snap = RoundSnapshot {
            active_slot: Some(1),
            slot_labels: [Some("a"), Some("b"), None, None, None],
            ..RoundSnapshot::default()
        };
        assert_eq!(snap.visible_label(), None);
        snap.slot_visible = true;
        assert_eq!(snap.visible_label(), Some("b"));
    }
}
