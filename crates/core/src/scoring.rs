//! Scoring module - points, streaks, speed bonus and ticket rewards
//!
//! Rules:
//! - A hit is worth [`HIT_POINTS`]; every [`STREAK_BONUS_EVERY`]th consecutive
//!   hit adds [`STREAK_BONUS_POINTS`] and counts as one streak bonus.
//! - The first miss on a mole costs [`MISS_PENALTY`], never going below zero.
//! - A hit whose reaction time is within a share of the mole window is "fast".
//!   Every [`SPEED_BONUS_EVERY`]th fast hit earns one speed ticket, capped per round.
//! - Base tickets come from the score-tier table; bonuses are added on top.
//!   Training rounds earn nothing.

use crate::types::{
    TicketBreakdown, HIT_POINTS, MISS_PENALTY, STREAK_BONUS_EVERY, STREAK_BONUS_POINTS,
    TICKET_TIERS,
};

/// Points awarded for one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitScore {
    /// Base points plus any streak bonus.
    pub points: u32,
    /// Whether this hit completed a streak bonus.
    pub streak_bonus: bool,
}

/// Score a hit given the streak *after* counting it.
///
/// # Examples
///
/// ```
/// use whack_a_braille_core::scoring::calculate_hit_score;
///
/// assert_eq!(calculate_hit_score(1).points, 10);
/// assert_eq!(calculate_hit_score(5).points, 20);
/// assert!(calculate_hit_score(10).streak_bonus);
/// ```
pub fn calculate_hit_score(streak: u32) -> HitScore {
    let streak_bonus = streak > 0 && streak % STREAK_BONUS_EVERY == 0;
    let points = if streak_bonus {
        HIT_POINTS + STREAK_BONUS_POINTS
    } else {
        HIT_POINTS
    };
    HitScore {
        points,
        streak_bonus,
    }
}

/// Apply the miss penalty, flooring at zero.
pub fn apply_miss_penalty(score: u32) -> u32 {
    score.saturating_sub(MISS_PENALTY)
}

/// Whether a hit counts as fast.
///
/// A hit is fast when `reaction_ms <= window_ms * threshold_percent / 100`.
pub fn is_fast_hit(reaction_ms: u32, window_ms: u32, threshold_percent: u32) -> bool {
    (reaction_ms as u64) * 100 <= (window_ms as u64) * (threshold_percent as u64)
}

/// Whether the latest fast hit earns a speed ticket.
///
/// `fast_hits` is the count including the latest one; `tickets` is the number
/// already earned this round.
pub fn earns_speed_ticket(fast_hits: u32, tickets: u32, every: u32, cap: u32) -> bool {
    every > 0 && fast_hits > 0 && fast_hits % every == 0 && tickets < cap
}

/// Base tickets from the score-tier table.
///
/// # Examples
///
/// ```
/// use whack_a_braille_core::scoring::tickets_for_score;
///
/// assert_eq!(tickets_for_score(0), 0);
/// assert_eq!(tickets_for_score(50), 5);
/// assert_eq!(tickets_for_score(149), 10);
/// assert_eq!(tickets_for_score(500), 20);
/// ```
pub fn tickets_for_score(score: u32) -> u32 {
    TICKET_TIERS
        .iter()
        .find(|&&(min_score, _)| score >= min_score)
        .map(|&(_, tickets)| tickets)
        .unwrap_or(0)
}

/// Full ticket breakdown for a finished round.
pub fn ticket_breakdown(
    score: u32,
    streak_bonus_count: u32,
    speed_bonus_tickets: u32,
    is_training: bool,
) -> TicketBreakdown {
    if is_training {
        return TicketBreakdown::default();
    }
    TicketBreakdown::new(
        tickets_for_score(score),
        streak_bonus_count,
        speed_bonus_tickets,
    )
}
