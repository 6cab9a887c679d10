//! Session: the terminal host around one [`RoundEngine`].
//!
//! Owns the screens (lead-in, playing, results), feeds terminal events to
//! the input resolver, forwards speech reports to the engine and routes the
//! engine's effects. It does no terminal I/O itself, so a test can drive a
//! whole session with synthetic events and elapsed times.

use crossterm::event::{Event, KeyEvent};
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::core::{RoundEngine, RoundSnapshot};
use crate::dispatch::{Announcer, HostState};
use crate::input::{command_for_key, route_key, AppCommand, InputResolver};
use crate::results::ResultsLog;
use crate::term::{FrameBuffer, GameView, Viewport};
use crate::types::{AnnounceRequest, RoundSummary, ROUND_LEAD_IN_MS};

/// What the session is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Opening announcement spoken; the round starts when the timer runs out.
    LeadIn { remaining_ms: u32 },
    Playing,
    Results(RoundSummary),
}

/// Whether the host loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    config: GameConfig,
    engine: RoundEngine,
    resolver: InputResolver,
    speech: Box<dyn Announcer>,
    host: HostState,
    results: Option<ResultsLog>,
    screen: Screen,
    snapshot: RoundSnapshot,
    view: GameView,
}

impl Session {
    pub fn new(config: GameConfig, speech: Box<dyn Announcer>, release_events: bool) -> Self {
        let engine = RoundEngine::with_config(config.seed, config.engine_config());
        Self {
            engine,
            resolver: InputResolver::new().with_release_events(release_events),
            speech,
            host: HostState::new(),
            results: None,
            screen: Screen::Playing,
            snapshot: RoundSnapshot::default(),
            view: GameView::default(),
            config,
        }
    }

    pub fn with_results_log(mut self, log: ResultsLog) -> Self {
        self.results = Some(log);
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn host(&self) -> &HostState {
        &self.host
    }

    pub fn results_log(&self) -> Option<&ResultsLog> {
        self.results.as_ref()
    }

    /// Speak the opening line and start the lead-in to the next round.
    pub fn begin(&mut self) {
        let text = opening_announcement(&self.config.mode_id);
        self.host.set_status(text);
        self.speech.announce(AnnounceRequest::message(text));
        self.screen = Screen::LeadIn {
            remaining_ms: ROUND_LEAD_IN_MS,
        };
    }

    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if self.screen == Screen::Playing {
                    self.resolver.commit_text(&text);
                }
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if let Some(command) = command_for_key(key) {
            return self.handle_command(command);
        }
        // Without an attached round the resolver ignores strokes.
        route_key(&mut self.resolver, key);
        Flow::Continue
    }

    fn handle_command(&mut self, command: AppCommand) -> Flow {
        match command {
            AppCommand::Quit => {
                if self.engine.stop(true) {
                    self.drain_effects();
                }
                return Flow::Quit;
            }
            AppCommand::RepeatTarget => {
                if let Some(text) = self.engine.current_speech_payload() {
                    self.speech.announce(AnnounceRequest::message(text));
                }
            }
            AppCommand::EndRoundEarly => {
                if self.engine.params().difficulty.is_training() && self.engine.stop(false) {
                    self.drain_effects();
                }
            }
            AppCommand::Confirm => {
                if matches!(self.screen, Screen::Results(_)) {
                    self.begin();
                }
            }
        }
        Flow::Continue
    }

    /// Advance everything by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.resolver.update(elapsed_ms);

        while let Some(report) = self.speech.poll_report() {
            if let Some(mole_id) = report.mole_id {
                self.engine.announcement_settled(mole_id, report.outcome);
            }
        }

        if let Screen::LeadIn { remaining_ms } = &mut self.screen {
            *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
            if *remaining_ms == 0 {
                self.screen = Screen::Playing;
                if !self.engine.start(self.config.round_params()) {
                    warn!("round already live at end of lead-in");
                }
            }
        } else {
            self.engine.tick(elapsed_ms);
        }

        self.drain_effects();
        self.host.update(elapsed_ms);
    }

    fn drain_effects(&mut self) {
        if !self.engine.has_effects() {
            return;
        }
        let effects = self.engine.take_effects();
        self.host
            .apply(effects, &mut self.resolver, self.speech.as_mut());

        if let Some(summary) = self.host.take_finished() {
            if let Some(log) = self.results.as_mut() {
                if let Err(err) = log.append(&summary) {
                    warn!(path = %log.path().display(), error = %err, "failed to log round");
                }
            }
            debug!(rounds = self.engine.rounds_played(), "showing results");
            self.screen = Screen::Results(summary);
        }
    }

    /// Draw the current screen.
    pub fn render_into(&mut self, viewport: Viewport, fb: &mut FrameBuffer) {
        match &self.screen {
            Screen::Results(summary) => self.view.render_results_into(summary, viewport, fb),
            Screen::LeadIn { .. } | Screen::Playing => {
                self.engine.snapshot_into(&mut self.snapshot);
                let hud = self.host.hud(self.speech.is_enabled());
                self.view.render_into(&self.snapshot, &hud, viewport, fb);
            }
        }
    }
}

/// First line spoken before every round.
pub fn opening_announcement(mode_id: &str) -> &'static str {
    if mode_id.eq_ignore_ascii_case("everything") {
        "Incoming Mole Invasion!"
    } else {
        "Ready?"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_line_depends_on_mode() {
        assert_eq!(opening_announcement("everything"), "Incoming Mole Invasion!");
        assert_eq!(opening_announcement("grade1Letters"), "Ready?");
    }
}
