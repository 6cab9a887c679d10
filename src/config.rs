//! Game configuration.
//!
//! Defaults, then an optional JSON settings file, then environment variables.
//!
//! # Environment Variables
//!
//! - `WAB_SETTINGS_PATH`: JSON settings file (camelCase keys)
//! - `WAB_MODE`: braille mode id (default `grade1Letters`)
//! - `WAB_ROUND_SECONDS`: round length in seconds (default 30)
//! - `WAB_INPUT_MODE`: `qwerty` or `perkins`
//! - `WAB_DIFFICULTY`: `beginner`, `normal`, `expert`, `supreme` or `training`
//! - `WAB_SPEAK_DOTS`: speak dot numbers after each target in training
//! - `WAB_SEED`: RNG seed (default: derived from the clock)
//! - `WAB_TRAINING_CAP`: moles per training round (default 20)
//! - `WAB_RESULTS_PATH`: JSON-lines file receiving one summary per round
//!
//! Speech variables (`WAB_SPEECH_*`) are read by the speech crate and
//! `WAB_LOG_PATH` by the binary before anything else runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::core::{EngineConfig, RoundParams};
use crate::speech::SpeechConfig;
use crate::types::{Difficulty, InputMode, TRAINING_MOLE_CAP};

pub const DEFAULT_MODE: &str = "grade1Letters";
pub const DEFAULT_ROUND_SECONDS: u32 = 30;

/// Persisted settings, as written by a settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsFile {
    pub braille_mode: Option<String>,
    /// Seconds.
    pub round_time: Option<u32>,
    pub input_mode: Option<String>,
    pub difficulty: Option<String>,
    pub speak_braille_dots: Option<bool>,
    pub speech_rate_percent: Option<u32>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub mode_id: String,
    pub round_seconds: u32,
    pub input_mode: InputMode,
    pub difficulty: Difficulty,
    pub speak_braille_dots: bool,
    pub seed: u32,
    pub training_cap: u32,
    pub results_path: Option<PathBuf>,
    /// Rate from the settings file; `WAB_SPEECH_RATE_PERCENT` wins.
    pub speech_rate_percent: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode_id: DEFAULT_MODE.to_string(),
            round_seconds: DEFAULT_ROUND_SECONDS,
            input_mode: InputMode::Qwerty,
            difficulty: Difficulty::Normal,
            speak_braille_dots: false,
            seed: 1,
            training_cap: TRAINING_MOLE_CAP,
            results_path: None,
            speech_rate_percent: None,
        }
    }
}

impl GameConfig {
    /// Create from the settings file and environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            seed: clock_seed(),
            ..Self::default()
        };
        if let Some(path) = non_empty_var("WAB_SETTINGS_PATH") {
            match SettingsFile::load(Path::new(&path)) {
                Ok(settings) => config.apply_settings(&settings),
                Err(err) => warn!(error = %format!("{err:#}"), "ignoring settings file"),
            }
        }
        config.apply_env(non_empty_var);
        config
    }

    pub fn apply_settings(&mut self, settings: &SettingsFile) {
        if let Some(mode) = &settings.braille_mode {
            self.mode_id = mode.trim().to_string();
        }
        if let Some(seconds) = settings.round_time.filter(|s| *s > 0) {
            self.round_seconds = seconds;
        }
        if let Some(mode) = settings.input_mode.as_deref().and_then(InputMode::from_str) {
            self.input_mode = mode;
        }
        if let Some(difficulty) = settings.difficulty.as_deref().and_then(Difficulty::from_str) {
            self.difficulty = difficulty;
        }
        if let Some(speak) = settings.speak_braille_dots {
            self.speak_braille_dots = speak;
        }
        if let Some(rate) = settings.speech_rate_percent {
            self.speech_rate_percent = Some(rate.clamp(1, 100));
        }
    }

    /// Apply overrides from `lookup` (the process environment in production).
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(mode) = lookup("WAB_MODE") {
            self.mode_id = mode.trim().to_string();
        }
        if let Some(v) = lookup("WAB_ROUND_SECONDS") {
            match v.trim().parse::<u32>() {
                Ok(s) if s > 0 => self.round_seconds = s,
                _ => warn!(value = %v, "ignoring WAB_ROUND_SECONDS"),
            }
        }
        if let Some(v) = lookup("WAB_INPUT_MODE") {
            match InputMode::from_str(&v) {
                Some(mode) => self.input_mode = mode,
                None => warn!(value = %v, "ignoring WAB_INPUT_MODE"),
            }
        }
        if let Some(v) = lookup("WAB_DIFFICULTY") {
            match Difficulty::from_str(&v) {
                Some(d) => self.difficulty = d,
                None => warn!(value = %v, "ignoring WAB_DIFFICULTY"),
            }
        }
        if let Some(v) = lookup("WAB_SPEAK_DOTS") {
            self.speak_braille_dots = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(seed) = lookup("WAB_SEED").and_then(|s| s.trim().parse().ok()) {
            self.seed = seed;
        }
        if let Some(cap) = lookup("WAB_TRAINING_CAP").and_then(|s| s.trim().parse().ok()) {
            self.training_cap = cap;
        }
        if let Some(path) = lookup("WAB_RESULTS_PATH") {
            self.results_path = Some(PathBuf::from(path));
        }
    }

    pub fn round_params(&self) -> RoundParams {
        RoundParams::new(
            self.mode_id.clone(),
            self.difficulty,
            self.round_seconds.saturating_mul(1000),
        )
        .with_input_mode(self.input_mode)
        .with_braille_dots(self.speak_braille_dots)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            training_cap: self.training_cap.max(1),
            ..EngineConfig::default()
        }
    }

    pub fn speech_config(&self) -> SpeechConfig {
        let config = SpeechConfig::from_env();
        match self.speech_rate_percent {
            Some(rate) if std::env::var_os("WAB_SPEECH_RATE_PERCENT").is_none() => {
                config.with_rate_percent(rate)
            }
            _ => config,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        let params = config.round_params();
        assert_eq!(params.mode_id, "grade1Letters");
        assert_eq!(params.duration_ms, 30_000);
        assert_eq!(params.difficulty, Difficulty::Normal);
        assert_eq!(config.engine_config().training_cap, TRAINING_MOLE_CAP);
    }

    #[test]
    fn test_settings_file_camel_case() {
        let settings: SettingsFile = serde_json::from_str(
            r#"{"brailleMode":"grade2Words","roundTime":60,"inputMode":"perkins",
                "difficulty":"expert","speakBrailleDots":true,"speechRatePercent":250}"#,
        )
        .unwrap();
        let mut config = GameConfig::default();
        config.apply_settings(&settings);
        assert_eq!(config.mode_id, "grade2Words");
        assert_eq!(config.round_seconds, 60);
        assert_eq!(config.input_mode, InputMode::Perkins);
        assert_eq!(config.difficulty, Difficulty::Expert);
        assert!(config.speak_braille_dots);
        assert_eq!(config.speech_rate_percent, Some(100));
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: SettingsFile = serde_json::from_str(r#"{"roundTime":0}"#).unwrap();
        let mut config = GameConfig::default();
        config.apply_settings(&settings);
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_env_overrides_settings() {
        let mut config = GameConfig::default();
        config.apply_settings(&SettingsFile {
            difficulty: Some("beginner".to_string()),
            ..SettingsFile::default()
        });
        config.apply_env(env(&[
            ("WAB_DIFFICULTY", "training"),
            ("WAB_ROUND_SECONDS", "90"),
            ("WAB_SEED", "42"),
            ("WAB_TRAINING_CAP", "5"),
            ("WAB_RESULTS_PATH", "/tmp/wab.jsonl"),
        ]));
        assert_eq!(config.difficulty, Difficulty::Training);
        assert_eq!(config.round_seconds, 90);
        assert_eq!(config.seed, 42);
        assert_eq!(config.engine_config().training_cap, 5);
        assert_eq!(config.results_path, Some(PathBuf::from("/tmp/wab.jsonl")));
    }

    #[test]
    fn test_bad_env_values_ignored() {
        let mut config = GameConfig::default();
        config.apply_env(env(&[
            ("WAB_ROUND_SECONDS", "soon"),
            ("WAB_INPUT_MODE", "dvorak"),
            ("WAB_SEED", "-1"),
        ]));
        assert_eq!(config.round_seconds, DEFAULT_ROUND_SECONDS);
        assert_eq!(config.input_mode, InputMode::Qwerty);
        assert_eq!(config.seed, 1);
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let err = SettingsFile::load(Path::new("/nonexistent/wab-settings.json")).unwrap_err();
        assert!(format!("{err:#}").contains("wab-settings.json"));
    }
}
