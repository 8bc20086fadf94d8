//! Configuration management for manga-shelf.
//!
//! Handles:
//! - History store location
//! - Grouping thresholds (recency window, session gap)
//! - Carousel behavior (drag threshold, click window, auto-scroll)
//! - TUI theme settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::carousel::CarouselOptions;
use crate::error::{Result, ShelfError};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// History store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Grouping thresholds.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Carousel behavior.
    #[serde(default)]
    pub carousel: CarouselConfig,
    /// TUI theme.
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShelfError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| ShelfError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge_from(&mut self, other: &Config) {
        if other.store.history_file.is_some() {
            self.store.history_file = other.store.history_file.clone();
        }

        if other.history.window_days != default_window_days() {
            self.history.window_days = other.history.window_days;
        }
        if other.history.session_gap_minutes != default_session_gap_minutes() {
            self.history.session_gap_minutes = other.history.session_gap_minutes;
        }

        let carousel_defaults = CarouselConfig::default();
        if (other.carousel.drag_threshold - carousel_defaults.drag_threshold).abs() > f32::EPSILON {
            self.carousel.drag_threshold = other.carousel.drag_threshold;
        }
        if other.carousel.click_max_ms != carousel_defaults.click_max_ms {
            self.carousel.click_max_ms = other.carousel.click_max_ms;
        }
        if other.carousel.resume_delay_ms != carousel_defaults.resume_delay_ms {
            self.carousel.resume_delay_ms = other.carousel.resume_delay_ms;
        }
        if other.carousel.auto_scroll_speed != carousel_defaults.auto_scroll_speed {
            self.carousel.auto_scroll_speed = other.carousel.auto_scroll_speed;
        }
        if other.carousel.scroll_amount != carousel_defaults.scroll_amount {
            self.carousel.scroll_amount = other.carousel.scroll_amount;
        }

        if other.theme.name != default_theme() {
            self.theme.name = other.theme.name.clone();
        }
        self.theme.color = other.theme.color;
        self.theme.unicode = other.theme.unicode;
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ShelfError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())?;

        Ok(())
    }

    /// Resolve the history file path: explicit override, then config, then
    /// the default data location.
    pub fn history_file(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.store.history_file {
            return Ok(path.clone());
        }
        default_history_path()
    }
}

/// History store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the local history snapshot.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

/// Grouping thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Trailing window (days) a title must have been read within to show.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// Gap (minutes) between reads that starts a new session.
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            session_gap_minutes: default_session_gap_minutes(),
        }
    }
}

impl HistoryConfig {
    /// Recency window as a chrono duration.
    #[must_use]
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::days(self.window_days)
    }

    /// Session gap as a chrono duration.
    #[must_use]
    pub fn session_gap(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_gap_minutes)
    }
}

/// Carousel behavior.
///
/// Widths and speeds are in terminal columns; the defaults suit a shelf of
/// cover cards in an ordinary terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Cumulative movement (columns) that turns a gesture into a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,
    /// Longest press (ms) still accepted as a click.
    #[serde(default = "default_click_max_ms")]
    pub click_max_ms: u64,
    /// Quiet period (ms) after an interaction before auto-scroll resumes.
    #[serde(default = "default_resume_delay_ms")]
    pub resume_delay_ms: u64,
    /// Auto-scroll speed in columns per second; absent disables the loop.
    #[serde(default = "default_auto_scroll_speed")]
    pub auto_scroll_speed: Option<f32>,
    /// Gap (columns) between cards.
    #[serde(default = "default_card_gap")]
    pub card_gap: f32,
    /// Card width (columns) assumed until a card is measured.
    #[serde(default = "default_card_width")]
    pub card_width: f32,
    /// Cards per page before the viewport is measured.
    #[serde(default = "default_scroll_amount")]
    pub scroll_amount: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            drag_threshold: default_drag_threshold(),
            click_max_ms: default_click_max_ms(),
            resume_delay_ms: default_resume_delay_ms(),
            auto_scroll_speed: default_auto_scroll_speed(),
            card_gap: default_card_gap(),
            card_width: default_card_width(),
            scroll_amount: default_scroll_amount(),
        }
    }
}

impl From<&CarouselConfig> for CarouselOptions {
    fn from(config: &CarouselConfig) -> Self {
        Self {
            drag_threshold: config.drag_threshold,
            click_max_ms: config.click_max_ms,
            resume_delay_ms: config.resume_delay_ms,
            auto_scroll_speed: config.auto_scroll_speed,
            card_gap: config.card_gap,
            default_card_width: config.card_width,
            scroll_amount: config.scroll_amount,
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name.
    #[serde(default = "default_theme")]
    pub name: String,
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Use Unicode characters.
    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme(),
            color: true,
            unicode: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_window_days() -> i64 {
    30
}

fn default_session_gap_minutes() -> i64 {
    120
}

fn default_drag_threshold() -> f32 {
    10.0
}

fn default_click_max_ms() -> u64 {
    200
}

fn default_resume_delay_ms() -> u64 {
    2500
}

fn default_auto_scroll_speed() -> Option<f32> {
    Some(6.0)
}

fn default_card_gap() -> f32 {
    2.0
}

fn default_card_width() -> f32 {
    24.0
}

fn default_scroll_amount() -> usize {
    3
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| ShelfError::InvalidConfig {
        message: "could not determine the config directory".to_string(),
    })?;

    Ok(config_dir.join("manga-shelf").join("config.toml"))
}

/// Get the default history snapshot path.
pub fn default_history_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| ShelfError::InvalidConfig {
        message: "could not determine the data directory".to_string(),
    })?;

    Ok(data_dir.join("manga-shelf").join("history.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.window_days, 30);
        assert_eq!(config.history.session_gap_minutes, 120);
        assert_eq!(config.carousel.click_max_ms, 200);
        assert!(config.theme.color);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.history.window_days, config.history.window_days);
        assert_eq!(parsed.carousel.scroll_amount, config.carousel.scroll_amount);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[history]
session_gap_minutes = 90
"#,
        )
        .unwrap();
        assert_eq!(parsed.history.session_gap_minutes, 90);
        assert_eq!(parsed.history.window_days, 30);
        assert_eq!(parsed.carousel.resume_delay_ms, 2500);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        let mut overlay = Config::default();

        overlay.history.window_days = 14;
        overlay.carousel.auto_scroll_speed = None;
        overlay.theme.name = "light".to_string();

        base.merge_from(&overlay);

        assert_eq!(base.history.window_days, 14);
        assert_eq!(base.carousel.auto_scroll_speed, None);
        assert_eq!(base.theme.name, "light");
        // Untouched settings keep their values.
        assert_eq!(base.carousel.click_max_ms, 200);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.store.history_file = Some(PathBuf::from("/tmp/history.json"));
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(
            reloaded.store.history_file,
            Some(PathBuf::from("/tmp/history.json"))
        );
    }

    #[test]
    fn test_history_file_resolution_order() {
        let mut config = Config::default();
        config.store.history_file = Some(PathBuf::from("/from/config.json"));

        let explicit = PathBuf::from("/from/flag.json");
        assert_eq!(config.history_file(Some(&explicit)).unwrap(), explicit);
        assert_eq!(
            config.history_file(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
