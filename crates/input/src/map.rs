//! Key mapping from terminal events to app commands and key strokes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::resolver::{InputResolver, KeyDisposition};

/// Host-level commands that never reach attempt resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
    /// Speak the current target again.
    RepeatTarget,
    /// End a training round now.
    EndRoundEarly,
    /// Start the next round from the results screen.
    Confirm,
}

/// A printable key going down (or repeating) or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStroke {
    Down(char),
    Up(char),
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && (key.code == KeyCode::Esc
            || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Map keyboard input to app commands. Only presses count.
pub fn command_for_key(key: KeyEvent) -> Option<AppCommand> {
    if should_quit(key) {
        return Some(AppCommand::Quit);
    }
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('`') => Some(AppCommand::RepeatTarget),
        KeyCode::Char('\\') => Some(AppCommand::EndRoundEarly),
        KeyCode::Enter => Some(AppCommand::Confirm),
        _ => None,
    }
}

/// Map a printable key event to a stroke. Command keys and chords with
/// Ctrl/Alt are not strokes.
pub fn key_stroke(key: KeyEvent) -> Option<KeyStroke> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    if matches!(ch, '`' | '\\') || ch.is_control() {
        return None;
    }
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(KeyStroke::Down(ch)),
        KeyEventKind::Release => Some(KeyStroke::Up(ch)),
    }
}

/// Feed a key event to the resolver.
pub fn route_key(resolver: &mut InputResolver, key: KeyEvent) -> KeyDisposition {
    match key_stroke(key) {
        Some(KeyStroke::Down(ch)) => resolver.key_down(ch),
        Some(KeyStroke::Up(ch)) => resolver.key_up(ch),
        None => KeyDisposition::Ignored,
    }
}
