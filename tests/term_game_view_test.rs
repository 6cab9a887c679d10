use whack_a_braille::core::{RoundEngine, RoundParams, RoundSnapshot};
use whack_a_braille::term::{AnchorY, FrameBuffer, GameView, HudView, Viewport};
use whack_a_braille::types::{
    Difficulty, EndReason, InputMode, RoundSummary, SpeechOutcome, TicketBreakdown, TICK_MS,
};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

fn summary(is_training: bool) -> RoundSummary {
    RoundSummary {
        mode_id: "grade1Letters".to_string(),
        input_mode: InputMode::Qwerty,
        difficulty: if is_training {
            Difficulty::Training
        } else {
            Difficulty::Normal
        },
        duration_ms: 30_000,
        is_training,
        end_reason: if is_training {
            EndReason::TrainingComplete
        } else {
            EndReason::TimeUp
        },
        score: if is_training { 0 } else { 120 },
        hits: 12,
        misses: 1,
        escapes: 3,
        streak_bonus_count: 1,
        tickets: if is_training {
            TicketBreakdown::default()
        } else {
            TicketBreakdown::new(10, 1, 2)
        },
    }
}

/// Engine snapshot with a mole visibly up.
fn live_snapshot() -> RoundSnapshot {
    let mut engine = RoundEngine::new(99);
    engine.start(RoundParams::new("grade1Letters", Difficulty::Normal, 30_000));
    while engine.active_mole_id().is_none() {
        engine.tick(TICK_MS);
    }
    engine.announcement_settled(engine.active_mole_id(), SpeechOutcome::started_after(0));
    engine.snapshot()
}

#[test]
fn term_view_draws_five_holes_when_anchored_top() {
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(view.board_width(), view.board_height());
    let fb = view.render(&RoundSnapshot::default(), &HudView::default(), vp);

    // Holes start on row 2 under the title.
    for slot in 0..5 {
        let x = view.hole_x(0, slot);
        assert_eq!(fb.get(x, 2).unwrap().ch, '┌');
    }
    assert!(fb.row_text(0).contains("WHACK-A-BRAILLE"));
}

#[test]
fn term_view_centers_board_on_large_viewports() {
    let view = GameView::default();
    let vp = Viewport::new(100, 40);
    let (x, y) = view.origin(vp);
    let fb = view.render(&RoundSnapshot::default(), &HudView::default(), vp);
    assert_eq!(fb.get(x, y + 2).unwrap().ch, '┌');
    assert!(x > 0 && y > 0);
}

#[test]
fn term_view_shows_active_label_and_score() {
    let snap = live_snapshot();
    let slot = snap.active_slot.unwrap();
    let label = snap.slot_labels[slot].unwrap();

    let view = GameView::default();
    let fb = view.render(
        &snap,
        &HudView {
            status: "",
            hit_slot: None,
            speech_enabled: true,
        },
        Viewport::new(80, 24),
    );
    let all = screen_text(&fb);
    assert!(all.contains(label));
    assert!(all.contains("SCORE 0"));
    assert!(all.contains("TIME "));
    assert!(all.contains("QWERTY"));
    assert!(!all.contains("SPEECH OFF"));
}

#[test]
fn term_view_renders_status_line() {
    let view = GameView::default();
    let hud = HudView {
        status: "Ready?",
        hit_slot: None,
        speech_enabled: false,
    };
    let fb = view.render(&RoundSnapshot::default(), &hud, Viewport::new(80, 24));
    let all = screen_text(&fb);
    assert!(all.contains("Ready?"));
    assert!(all.contains("SPEECH OFF"));
}

#[test]
fn term_view_results_lists_scoring_lines() {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(1, 1);
    view.render_results_into(&summary(false), Viewport::new(80, 24), &mut fb);
    let all = screen_text(&fb);
    assert!(all.contains("Results"));
    assert!(all.contains("SCORE"));
    assert!(all.contains("120"));
    assert!(all.contains("TICKETS"));
    assert!(all.contains("13"));
    assert!(all.contains("ESCAPES"));
    assert!(all.contains("keep whacking"));
}

#[test]
fn term_view_training_results_hide_scoring_lines() {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(1, 1);
    view.render_results_into(&summary(true), Viewport::new(80, 24), &mut fb);
    let all = screen_text(&fb);
    assert!(all.contains("Training Complete!"));
    assert!(all.contains("MOLES FOUND"));
    assert!(!all.contains("SCORE"));
    assert!(!all.contains("TICKETS"));
    assert!(!all.contains("MISSES"));
    assert!(all.contains("keep training"));
}
