//! Whack-a-Braille terminal runner.
//!
//! Sets up logging, the terminal and speech, then drives a [`Session`] at a
//! fixed tick with crossterm events in between. Rendering goes through the
//! framebuffer renderer (no ratatui widgets/layout).

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use whack_a_braille::config::GameConfig;
use whack_a_braille::dispatch::{Announcer, MutedSpeech};
use whack_a_braille::results::ResultsLog;
use whack_a_braille::session::{Flow, Session};
use whack_a_braille::speech::{SpeechConfig, SpeechRuntime};
use whack_a_braille::term::{FrameBuffer, TerminalRenderer, Viewport};
use whack_a_braille::types::TICK_MS;

fn main() -> Result<()> {
    init_tracing();
    let config = GameConfig::from_env();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Log to `WAB_LOG_PATH` when set; a TUI has nowhere else to write.
fn init_tracing() {
    let Some(path) = std::env::var_os("WAB_LOG_PATH").map(PathBuf::from) else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {}: {err}", path.display());
            return;
        }
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();
    info!(path = %path.display(), "logging initialized");
}

fn start_speech(config: &GameConfig) -> Box<dyn Announcer> {
    if SpeechConfig::is_disabled() {
        info!("speech disabled");
        return Box::new(MutedSpeech::default());
    }
    match SpeechRuntime::start(config.speech_config()) {
        Ok(runtime) => Box::new(runtime),
        Err(err) => {
            warn!(error = %err, "speech unavailable");
            Box::new(MutedSpeech::default())
        }
    }
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let results = config.results_path.as_deref().and_then(|path| {
        ResultsLog::open(path)
            .map_err(|err| warn!(error = %format!("{err:#}"), "results log disabled"))
            .ok()
    });

    let speech = start_speech(&config);
    let mut session = Session::new(config, speech, term.release_events());
    if let Some(log) = results {
        session = session.with_results_log(log);
    }
    session.begin();

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(w, h);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.render_into(Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;
            if matches!(event, Event::Resize(_, _)) {
                term.invalidate();
            }
            if session.handle_event(event) == Flow::Quit {
                return Ok(());
            }
        }

        // Tick on real elapsed time so the round clock does not drift.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }
    }
}
