//! Mole timing - difficulty ramp, inter-mole gap and visible window sizing
//!
//! Both the gap between moles and the base up-time interpolate linearly from
//! their start to their end value as the round progresses (0 → 1). Rounds of
//! at least [`LONG_ROUND_MS`] ramp faster: progress is eased out and the back
//! half of the round shrinks the base up-time further.
//!
//! The visible window is the base up-time scaled by the difficulty, widened by
//! however long speech took to start plus a reaction buffer, then clamped.

use crate::types::{
    Difficulty, SpeechOutcome, END_INTERVAL_MS, END_UP_TIME_MS, LONG_ROUND_END_SCALE_PERCENT,
    LONG_ROUND_MS, MAX_WINDOW_MS, MIN_INTERVAL_MS, MIN_WINDOW_MS, REACTION_BUFFER_MS,
    ROUND_END_GRACE_MS, SPEECH_NO_START_PAD_MS, SPEECH_TIMEOUT_PAD_MS, START_INTERVAL_MS,
    START_UP_TIME_MS,
};

/// Longest grace window accepted from configuration.
pub const MAX_ROUND_END_GRACE_MS: u32 = 750;

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

fn is_long_round(duration_ms: Option<u32>) -> bool {
    duration_ms.is_some_and(|d| d >= LONG_ROUND_MS)
}

/// Progress used for the ramp, after long-round easing.
///
/// `raw` is clamped to `[0, 1]`. `duration_ms` is `None` for training rounds,
/// which ramp linearly over their mole cap.
pub fn ramp_progress(raw: f32, duration_ms: Option<u32>) -> f32 {
    let p = raw.clamp(0.0, 1.0);
    if is_long_round(duration_ms) {
        1.0 - (1.0 - p) * (1.0 - p)
    } else {
        p
    }
}

/// Extra scale on the base up-time during the back half of a long round.
fn back_half_scale(raw: f32, duration_ms: Option<u32>) -> f32 {
    let p = raw.clamp(0.0, 1.0);
    if !is_long_round(duration_ms) || p <= 0.5 {
        return 1.0;
    }
    let end_scale = LONG_ROUND_END_SCALE_PERCENT as f32 / 100.0;
    lerp(1.0, end_scale, (p - 0.5) * 2.0)
}

/// Base up-time before the difficulty multiplier.
pub fn base_up_time_ms(raw_progress: f32, duration_ms: Option<u32>) -> u32 {
    let t = ramp_progress(raw_progress, duration_ms);
    let base = lerp(START_UP_TIME_MS as f32, END_UP_TIME_MS as f32, t);
    (base * back_half_scale(raw_progress, duration_ms)).floor() as u32
}

/// Gap before the next mole, floored at [`MIN_INTERVAL_MS`].
pub fn mole_interval_ms(
    raw_progress: f32,
    duration_ms: Option<u32>,
    difficulty: Difficulty,
    jitter_ms: u32,
) -> u32 {
    let t = ramp_progress(raw_progress, duration_ms);
    let base = lerp(START_INTERVAL_MS as f32, END_INTERVAL_MS as f32, t);
    let scaled = (base * difficulty.timing_multiplier()).floor() as u32;
    scaled.saturating_add(jitter_ms).max(MIN_INTERVAL_MS)
}

/// How much the window is widened for speech.
///
/// # Examples
///
/// ```
/// use whack_a_braille_core::timing::speech_pad_ms;
/// use whack_a_braille_core::types::SpeechOutcome;
///
/// assert_eq!(speech_pad_ms(&SpeechOutcome::started_after(120)), 120);
/// assert_eq!(speech_pad_ms(&SpeechOutcome::timed_out()), 150);
/// assert_eq!(speech_pad_ms(&SpeechOutcome::unsupported()), 300);
/// ```
pub fn speech_pad_ms(outcome: &SpeechOutcome) -> u32 {
    if outcome.started {
        outcome.start_delay_ms.unwrap_or(0)
    } else if outcome.timed_out {
        SPEECH_TIMEOUT_PAD_MS
    } else {
        SPEECH_NO_START_PAD_MS
    }
}

/// Visible window for a mole, clamped to `[MIN_WINDOW_MS, MAX_WINDOW_MS]`.
pub fn mole_window_ms(base_up_ms: u32, difficulty: Difficulty, outcome: &SpeechOutcome) -> u32 {
    let scaled = (base_up_ms as f32 * difficulty.timing_multiplier()).floor() as u32;
    scaled
        .saturating_add(speech_pad_ms(outcome))
        .saturating_add(REACTION_BUFFER_MS)
        .clamp(MIN_WINDOW_MS, MAX_WINDOW_MS)
}

/// Grace window after the round clock expires, clamped to a sane maximum.
pub fn round_end_grace_ms(requested_ms: Option<u32>) -> u32 {
    requested_ms
        .unwrap_or(ROUND_END_GRACE_MS)
        .min(MAX_ROUND_END_GRACE_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(900.0, 300.0, 0.0), 900.0);
        assert_eq!(lerp(900.0, 300.0, 1.0), 300.0);
        assert_eq!(lerp(900.0, 300.0, 0.5), 600.0);
    }

    #[test]
    fn test_short_round_is_linear() {
        assert_eq!(ramp_progress(0.25, Some(30_000)), 0.25);
        assert_eq!(base_up_time_ms(0.0, Some(30_000)), 650);
        assert_eq!(base_up_time_ms(1.0, Some(30_000)), 250);
        assert_eq!(base_up_time_ms(0.5, Some(30_000)), 450);
    }

    #[test]
    fn test_long_round_ramps_faster() {
        let short = base_up_time_ms(0.3, Some(30_000));
        let long = base_up_time_ms(0.3, Some(60_000));
        assert!(long < short);
    }

    #[test]
    fn test_long_round_back_half_scaled_down() {
        // End of a long round: base 250 scaled to 85%.
        assert_eq!(base_up_time_ms(1.0, Some(60_000)), 212);
        // Front half carries no extra scale.
        assert_eq!(back_half_scale(0.4, Some(60_000)), 1.0);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(base_up_time_ms(2.0, Some(30_000)), 250);
        assert_eq!(base_up_time_ms(-1.0, Some(30_000)), 650);
    }

    #[test]
    fn test_training_ramp_uses_linear_progress() {
        assert_eq!(ramp_progress(0.5, None), 0.5);
    }

    #[test]
    fn test_interval_difficulty_and_floor() {
        assert_eq!(mole_interval_ms(0.0, Some(30_000), Difficulty::Normal, 0), 900);
        assert_eq!(mole_interval_ms(0.0, Some(30_000), Difficulty::Beginner, 0), 1350);
        assert_eq!(mole_interval_ms(0.0, Some(30_000), Difficulty::Supreme, 0), 450);
        // 300 * 0.5 = 150 -> floored.
        assert_eq!(
            mole_interval_ms(1.0, Some(30_000), Difficulty::Supreme, 0),
            MIN_INTERVAL_MS
        );
        assert_eq!(mole_interval_ms(0.0, Some(30_000), Difficulty::Normal, 50), 950);
    }

    #[test]
    fn test_window_includes_speech_pad_and_buffer() {
        let started = SpeechOutcome::started_after(100);
        // 650 + 100 + 260
        assert_eq!(mole_window_ms(650, Difficulty::Normal, &started), 1010);
        // 650 + 300 + 260
        assert_eq!(
            mole_window_ms(650, Difficulty::Normal, &SpeechOutcome::unsupported()),
            1210
        );
        // 650 + 150 + 260
        assert_eq!(
            mole_window_ms(650, Difficulty::Normal, &SpeechOutcome::timed_out()),
            1060
        );
    }

    #[test]
    fn test_window_clamped() {
        let instant = SpeechOutcome::started_after(0);
        // 250 * 0.5 + 0 + 260 = 385 -> 400
        assert_eq!(mole_window_ms(250, Difficulty::Supreme, &instant), MIN_WINDOW_MS);
        let slow = SpeechOutcome::started_after(5_000);
        assert_eq!(mole_window_ms(650, Difficulty::Beginner, &slow), MAX_WINDOW_MS);
    }

    #[test]
    fn test_grace_clamped() {
        assert_eq!(round_end_grace_ms(None), 350);
        assert_eq!(round_end_grace_ms(Some(100)), 100);
        assert_eq!(round_end_grace_ms(Some(5_000)), MAX_ROUND_END_GRACE_MS);
    }
}
