//! Speech module - announce-and-await over an external TTS command
//!
//! The round engine only ever asks for an announcement and later learns how
//! it went (a [`SpeechOutcome`](types::SpeechOutcome)). This crate provides that collaborator for a
//! terminal host: every announcement spawns the configured text-to-speech
//! command on a background tokio runtime and reports back through a channel
//! the sync game loop polls with [`SpeechRuntime::try_recv`].
//!
//! - Spawning the process counts as "speech started"; its exit counts as "ended".
//! - A missing command reports `unsupported` immediately and is never retried.
//! - `cancel_previous` kills whatever is still speaking.
//! - An identical text still in flight is not spoken twice.
//!
//! # Environment Variables
//!
//! - `WAB_SPEECH_COMMAND`: program (plus fixed args) to run; the text is
//!   appended as the last argument. Defaults to `say` on macOS and
//!   `espeak-ng` elsewhere.
//! - `WAB_SPEECH_RATE_PERCENT`: 1-100 speaking rate (default 50)
//! - `WAB_SPEECH_DISABLED`: set to "1" or "true" to disable speech entirely

pub mod runtime;

pub use whack_a_braille_types as types;

pub use runtime::{SpeechReport, SpeechRuntime};

/// Default rate setting, middle of the slider.
pub const DEFAULT_RATE_PERCENT: u32 = 50;

/// Words per minute at a rate factor of 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Program followed by fixed arguments.
    pub command: Vec<String>,
    pub rate_percent: u32,
}

impl SpeechConfig {
    pub fn from_env() -> Self {
        use std::env;

        let command = env::var("WAB_SPEECH_COMMAND")
            .ok()
            .map(|s| s.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty())
            .unwrap_or_else(default_command);

        let rate_percent = env::var("WAB_SPEECH_RATE_PERCENT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RATE_PERCENT);

        Self {
            command,
            rate_percent: rate_percent.clamp(1, 100),
        }
    }

    pub fn with_rate_percent(mut self, rate_percent: u32) -> Self {
        self.rate_percent = rate_percent.clamp(1, 100);
        self
    }

    pub fn is_disabled() -> bool {
        std::env::var("WAB_SPEECH_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }

    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Full argument list for speaking `text`.
    pub fn args_for(&self, text: &str) -> Vec<String> {
        let mut args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        let wpm = words_per_minute(percent_to_speech_rate(self.rate_percent));
        match self.program().map(program_name) {
            Some("say") => {
                args.push("-r".to_string());
                args.push(wpm.to_string());
            }
            Some("espeak") | Some("espeak-ng") => {
                args.push("-s".to_string());
                args.push(wpm.to_string());
            }
            _ => {}
        }
        args.push(text.to_string());
        args
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            rate_percent: DEFAULT_RATE_PERCENT,
        }
    }
}

fn default_command() -> Vec<String> {
    let program = if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak-ng"
    };
    vec![program.to_string()]
}

fn program_name(program: &str) -> &str {
    program.rsplit('/').next().unwrap_or(program)
}

/// Map a 1-100 slider value to a rate factor in `[0.6, 2.0]`.
///
/// # Examples
///
/// ```
/// use whack_a_braille_speech::percent_to_speech_rate;
///
/// assert_eq!(percent_to_speech_rate(1), 0.6);
/// assert_eq!(percent_to_speech_rate(100), 2.0);
/// ```
pub fn percent_to_speech_rate(percent: u32) -> f32 {
    let p = percent.clamp(1, 100) as f32;
    0.6 + (p - 1.0) / 99.0 * 1.4
}

pub fn words_per_minute(rate: f32) -> u32 {
    (BASE_WORDS_PER_MINUTE * rate).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_mapping() {
        assert!((percent_to_speech_rate(50) - 1.293).abs() < 0.01);
        assert_eq!(percent_to_speech_rate(0), 0.6);
        assert_eq!(percent_to_speech_rate(500), 2.0);
    }

    #[test]
    fn test_espeak_args() {
        let config = SpeechConfig {
            command: vec!["/usr/bin/espeak-ng".to_string(), "-v".to_string(), "en".to_string()],
            rate_percent: 1,
        };
        assert_eq!(
            config.args_for("a, Dot 1"),
            vec!["-v", "en", "-s", "105", "a, Dot 1"]
        );
    }

    #[test]
    fn test_say_args() {
        let config = SpeechConfig {
            command: vec!["say".to_string()],
            rate_percent: 100,
        };
        assert_eq!(config.args_for("the"), vec!["-r", "350", "the"]);
    }

    #[test]
    fn test_custom_command_gets_text_only() {
        let config = SpeechConfig {
            command: vec!["my-tts".to_string(), "--quiet".to_string()],
            rate_percent: 50,
        };
        assert_eq!(config.args_for("b"), vec!["--quiet", "b"]);
    }

    #[test]
    fn test_from_env_defaults() {
        // This test just ensures it doesn't panic and stays in range
        let config = SpeechConfig::from_env();
        assert!((1..=100).contains(&config.rate_percent));
        assert!(config.program().is_some());
    }
}
