//! GameView: maps a [`RoundSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom: title, a row of five holes with their slot
//! numbers, the score line, the status line and a key help line. The
//! results screen replaces the board once a round has ended.

use crate::core::RoundSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Difficulty, EndReason, InputMode, RoundSummary, SLOT_COUNT};

const TITLE: &str = "WHACK-A-BRAILLE";

const BG: Rgb = Rgb::new(0, 0, 0);
const GROUND: Rgb = Rgb::new(40, 28, 18);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Host state drawn alongside the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudView<'a> {
    /// Last announcement or host message.
    pub status: &'a str,
    /// Hole to flash as just hit.
    pub hit_slot: Option<usize>,
    pub speech_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the mole board.
pub struct GameView {
    /// Hole width in terminal columns, border included.
    hole_w: u16,
    /// Hole height in terminal rows, border included.
    hole_h: u16,
    /// Columns between holes.
    gap: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            hole_w: 9,
            hole_h: 5,
            gap: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(hole_w: u16, hole_h: u16) -> Self {
        Self {
            hole_w: hole_w.max(3),
            hole_h: hole_h.max(3),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Columns covered by the row of holes.
    pub fn board_width(&self) -> u16 {
        let n = SLOT_COUNT as u16;
        self.hole_w * n + self.gap * (n - 1)
    }

    /// Rows covered by everything the board screen draws.
    pub fn board_height(&self) -> u16 {
        // title, blank, holes, slot numbers, blank, score, blank, status, help
        self.hole_h + 8
    }

    /// Left column of hole `slot` for a board starting at `start_x`.
    pub fn hole_x(&self, start_x: u16, slot: usize) -> u16 {
        start_x + (slot as u16) * (self.hole_w + self.gap)
    }

    /// Top-left corner of the board for `viewport`.
    pub fn origin(&self, viewport: Viewport) -> (u16, u16) {
        let x = viewport.width.saturating_sub(self.board_width()) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(self.board_height()) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    pub fn render(&self, snap: &RoundSnapshot, hud: &HudView, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    /// Render the board into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(
        &self,
        snap: &RoundSnapshot,
        hud: &HudView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (start_x, start_y) = self.origin(viewport);
        let board_w = self.board_width();

        let title = CellStyle::plain(Rgb::new(250, 200, 90), BG).bold();
        fb.put_str_centered(start_x, board_w, start_y, TITLE, title);

        let holes_y = start_y + 2;
        for slot in 0..SLOT_COUNT {
            self.draw_hole(fb, snap, hud, self.hole_x(start_x, slot), holes_y, slot);
        }

        let numbers = CellStyle::plain(Rgb::new(150, 150, 160), BG);
        for slot in 0..SLOT_COUNT {
            let x = self.hole_x(start_x, slot) + self.hole_w / 2;
            fb.put_u32(x, holes_y + self.hole_h, slot as u32 + 1, numbers);
        }

        let score_y = holes_y + self.hole_h + 2;
        self.draw_score_line(fb, snap, start_x, score_y, board_w);

        let status = CellStyle::plain(Rgb::new(255, 255, 255), BG).bold();
        fb.put_str_centered(start_x, board_w, score_y + 2, hud.status, status);

        let help = CellStyle::plain(Rgb::new(130, 130, 140), BG).dim();
        let help_text = if snap.is_training {
            "` repeat   \\ end training   Esc quit"
        } else {
            "` repeat   Esc quit"
        };
        fb.put_str_centered(start_x, board_w, score_y + 3, help_text, help);
        if !hud.speech_enabled {
            let x = start_x.saturating_add(board_w).saturating_sub(9);
            fb.put_str(x, start_y, "SPEECH OFF", help);
        }
    }

    /// Render the end-of-round results.
    pub fn render_results_into(
        &self,
        summary: &RoundSummary,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let panel_w: u16 = 36;
        let panel_h: u16 = if summary.is_training { 9 } else { 18 };
        let x = viewport.width.saturating_sub(panel_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(panel_h) / 2,
            AnchorY::Top => 0,
        };
        let border = CellStyle::plain(Rgb::new(200, 200, 200), BG);
        draw_border(fb, x, y, panel_w, panel_h, border);

        let heading = CellStyle::plain(Rgb::new(250, 200, 90), BG).bold();
        let label = CellStyle::plain(Rgb::new(220, 220, 220), BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), BG);
        let dim = value.dim();

        let inner_x = x + 2;
        let value_x = x + 20;
        let mut row = y + 1;

        let title = if summary.is_training {
            "Training Complete! Great Work!"
        } else {
            match summary.end_reason {
                EndReason::NoItems => "No moles to whack",
                _ => "Results",
            }
        };
        fb.put_str_centered(x, panel_w, row, title, heading);
        row += 2;

        fb.put_str(inner_x, row, "MODE", label);
        fb.put_str(value_x, row, &summary.mode_id, value);
        row += 1;
        fb.put_str(inner_x, row, "INPUT", label);
        fb.put_str(value_x, row, input_mode_label(summary.input_mode), value);
        row += 1;

        if summary.is_training {
            fb.put_str(inner_x, row, "MOLES FOUND", label);
            fb.put_u32(value_x, row, summary.hits, value);
            row += 2;
        } else {
            fb.put_str(inner_x, row, "DIFFICULTY", label);
            fb.put_str(value_x, row, difficulty_label(summary.difficulty), value);
            row += 2;

            let lines: [(&str, u32); 8] = [
                ("SCORE", summary.score),
                ("TICKETS", summary.tickets.total),
                ("  from score", summary.tickets.base),
                ("  streak bonus", summary.tickets.streak_bonus),
                ("  speed bonus", summary.tickets.speed_bonus),
                ("HITS", summary.hits),
                ("MISSES", summary.misses),
                ("ESCAPES", summary.escapes),
            ];
            for (name, n) in lines {
                let style = if name.starts_with(' ') { dim } else { label };
                fb.put_str(inner_x, row, name, style);
                fb.put_u32(value_x, row, n, value);
                row += 1;
            }
            row += 1;
        }

        let prompt = if summary.is_training {
            "Enter: keep training   Esc: quit"
        } else {
            "Enter: keep whacking   Esc: quit"
        };
        fb.put_str_centered(x, panel_w, row.min(y + panel_h - 2), prompt, dim);
    }

    fn draw_hole(
        &self,
        fb: &mut FrameBuffer,
        snap: &RoundSnapshot,
        hud: &HudView,
        x: u16,
        y: u16,
        slot: usize,
    ) {
        let is_active = snap.active_slot == Some(slot);
        let is_up = is_active && snap.slot_visible;
        let is_hit = hud.hit_slot == Some(slot);

        let (edge, fill_bg) = if is_hit {
            (Rgb::new(120, 240, 120), Rgb::new(30, 90, 30))
        } else if is_up {
            (Rgb::new(250, 200, 90), Rgb::new(110, 70, 40))
        } else if is_active {
            // Picked, announcement still pending.
            (Rgb::new(170, 140, 90), GROUND)
        } else {
            (Rgb::new(110, 90, 70), GROUND)
        };
        let border = CellStyle::plain(edge, BG);
        draw_border(fb, x, y, self.hole_w, self.hole_h, border);

        let inner_w = self.hole_w - 2;
        let inner_h = self.hole_h - 2;
        let fill = CellStyle::plain(Rgb::new(90, 70, 55), fill_bg).dim();
        fb.fill_rect(x + 1, y + 1, inner_w, inner_h, ' ', fill);

        let mid_y = y + 1 + inner_h / 2;
        if is_up || is_hit {
            let style = CellStyle::plain(Rgb::new(255, 255, 255), fill_bg).bold();
            let label = snap.slot_labels[slot].unwrap_or("?");
            fb.put_str_centered(x + 1, inner_w, mid_y, label, style);
            if is_hit {
                fb.put_char(x + 1, y + 1, '*', style);
                fb.put_char(x + inner_w, y + 1, '*', style);
            }
        } else {
            fb.put_str_centered(x + 1, inner_w, mid_y, "·", fill);
        }
    }

    fn draw_score_line(
        &self,
        fb: &mut FrameBuffer,
        snap: &RoundSnapshot,
        x: u16,
        y: u16,
        w: u16,
    ) {
        let label = CellStyle::plain(Rgb::new(220, 220, 220), BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), BG);
        let right = x.saturating_add(w);

        let mut cx = x;
        if snap.is_training {
            cx = fb.put_str(cx, y, "TRAINING ", label);
            cx = fb.put_u32(cx, y, snap.training_completed, value);
            cx = fb.put_str(cx, y, "/", value);
            fb.put_u32(cx, y, snap.training_cap, value);
        } else {
            cx = fb.put_str(cx, y, "SCORE ", label);
            cx = fb.put_u32(cx, y, snap.score, value);
            cx = fb.put_str(cx + 3, y, "STREAK ", label);
            cx = fb.put_u32(cx, y, snap.streak, value);
            if let Some(ms) = snap.remaining_ms {
                cx = fb.put_str(cx + 3, y, "TIME ", label);
                cx = fb.put_u32(cx, y, ms.div_ceil(1000), value);
                fb.put_str(cx, y, "s", value);
            }
        }

        let mode = input_mode_label(snap.input_mode);
        let mode_x = right.saturating_sub(mode.len() as u16);
        fb.put_str(mode_x, y, mode, value.dim());
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn input_mode_label(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Qwerty => "QWERTY",
        InputMode::Perkins => "PERKINS",
    }
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "Beginner",
        Difficulty::Normal => "Normal",
        Difficulty::Expert => "Expert",
        Difficulty::Supreme => "Supreme",
        Difficulty::Training => "Training",
    }
}
