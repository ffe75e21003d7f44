//! Runtime settings backed by an ini file. Missing files are created with
//! defaults; unreadable values fall back per key so a half-edited file can
//! never stop the game from starting.

use crate::audio::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::game::gameplay::PlayConfig;
use crate::game::judgment::TimingWindows;
use crate::game::pitch::MatcherConfig;
use crate::game::scoring::DEFAULT_FEEDBACK_LIFETIME;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::Path;

pub const SETTINGS_PATH: &str = "save/settings.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub confidence_threshold: f64,
    pub tolerance_cents: f64,
    pub perfect_window: f64,
    pub good_window: f64,
    pub ok_window: f64,
    pub miss_window: f64,
    pub feedback_lifetime: f64,
    pub tuning: String,
}

impl Default for Settings {
    fn default() -> Self {
        let windows = TimingWindows::default();
        Settings {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            tolerance_cents: MatcherConfig::default().tolerance_cents,
            perfect_window: windows.perfect,
            good_window: windows.good,
            ok_window: windows.ok,
            miss_window: windows.miss,
            feedback_lifetime: DEFAULT_FEEDBACK_LIFETIME,
            tuning: "standard".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings, writing a default file first if none exists.
    /// Any failure degrades to defaults rather than erroring the session.
    pub fn load(path: &Path) -> Settings {
        let defaults = Settings::default();

        if !path.exists() {
            if let Err(e) = write_defaults(path, &defaults) {
                warn!("Could not write default settings to {:?}: {}", path, e);
            }
            return defaults;
        }

        let mut conf = Ini::new();
        if conf.load(path).is_err() {
            warn!("Failed to parse {:?}, using default settings.", path);
            return defaults;
        }

        let get_f64 = |section: &str, key: &str, fallback: f64| {
            conf.get(section, key)
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(fallback)
        };

        let settings = Settings {
            confidence_threshold: get_f64("audio", "confidence_threshold", defaults.confidence_threshold),
            tolerance_cents: get_f64("judge", "tolerance_cents", defaults.tolerance_cents),
            perfect_window: get_f64("judge", "perfect_window", defaults.perfect_window),
            good_window: get_f64("judge", "good_window", defaults.good_window),
            ok_window: get_f64("judge", "ok_window", defaults.ok_window),
            miss_window: get_f64("judge", "miss_window", defaults.miss_window),
            feedback_lifetime: get_f64("ui", "feedback_lifetime", defaults.feedback_lifetime),
            tuning: conf.get("chart", "tuning").unwrap_or(defaults.tuning),
        };
        info!("Settings loaded from {:?}.", path);
        settings
    }

    /// Resolves the loaded values into the judging configuration.
    pub fn play_config(&self) -> PlayConfig {
        PlayConfig {
            windows: TimingWindows {
                perfect: self.perfect_window,
                good: self.good_window,
                ok: self.ok_window,
                miss: self.miss_window,
            },
            matcher: MatcherConfig { tolerance_cents: self.tolerance_cents },
            confidence_threshold: self.confidence_threshold,
            feedback_lifetime: self.feedback_lifetime,
        }
    }
}

fn write_defaults(path: &Path, defaults: &Settings) -> Result<(), std::io::Error> {
    info!("Settings file not found, creating defaults at {:?}.", path);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut conf = Ini::new();
    conf.set("audio", "confidence_threshold", Some(defaults.confidence_threshold.to_string()));
    conf.set("judge", "tolerance_cents", Some(defaults.tolerance_cents.to_string()));
    conf.set("judge", "perfect_window", Some(defaults.perfect_window.to_string()));
    conf.set("judge", "good_window", Some(defaults.good_window.to_string()));
    conf.set("judge", "ok_window", Some(defaults.ok_window.to_string()));
    conf.set("judge", "miss_window", Some(defaults.miss_window.to_string()));
    conf.set("ui", "feedback_lifetime", Some(defaults.feedback_lifetime.to_string()));
    conf.set("chart", "tuning", Some(defaults.tuning.clone()));
    conf.write(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_the_shipping_ones() {
        let settings = Settings::default();
        assert_eq!(settings.confidence_threshold, 0.5);
        assert_eq!(settings.tolerance_cents, 50.0);
        assert_eq!(settings.perfect_window, 0.050);
        assert_eq!(settings.good_window, 0.100);
        assert_eq!(settings.ok_window, 0.150);
        assert_eq!(settings.miss_window, 0.300);
        assert_eq!(settings.feedback_lifetime, 1.0);
        assert_eq!(settings.tuning, "standard");
    }

    #[test]
    fn play_config_carries_the_loaded_values() {
        let mut settings = Settings::default();
        settings.tolerance_cents = 25.0;
        settings.perfect_window = 0.030;
        let config = settings.play_config();
        assert_eq!(config.matcher.tolerance_cents, 25.0);
        assert_eq!(config.windows.perfect, 0.030);
        assert_eq!(config.windows.miss, 0.300);
    }
}
