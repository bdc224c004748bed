//! User configuration: engine tuning and terminal host settings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/parallax-scroll/config.toml` (default
//! `~/.config/parallax-scroll/config.toml`).

use std::path::PathBuf;

use crate::core::EngineConfig;

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Smoothing and parallax constants handed to the engine.
    pub engine: EngineConfig,
    /// Pixels per terminal row.
    pub row_px: f64,
    /// Delay before a requested frame fires.
    pub frame_interval_ms: u64,
    /// Raw scroll distance of one wheel notch / arrow key.
    pub wheel_step_px: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            row_px: 16.0,
            frame_interval_ms: 16,
            wheel_step_px: 48.0,
        }
    }
}

impl AppConfig {
    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse_config(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let Ok(number) = value.parse::<f64>() else {
                tracing::debug!(key, value, "skipping non-numeric config value");
                continue;
            };
            match key {
                "ease" => cfg.engine.ease = number,
                "max_offset" => cfg.engine.max_offset = number,
                "max_depth" => cfg.engine.max_depth = number,
                "end_threshold" => cfg.engine.end_threshold = number,
                "max_elapsed_ms" => cfg.engine.max_elapsed_ms = number,
                "target_fpms" => cfg.engine.target_fpms = number,
                "row_px" if number >= 1.0 => cfg.row_px = number,
                "frame_interval_ms" if number >= 1.0 => {
                    // Keep this bounded for predictable UX.
                    cfg.frame_interval_ms = (number as u64).clamp(1, 250);
                }
                "wheel_step_px" if number > 0.0 => cfg.wheel_step_px = number,
                _ => {}
            }
        }

        cfg.engine = cfg.engine.validated();
        cfg
    }

    fn serialise(&self) -> String {
        let e = &self.engine;
        let lines = [
            "# parallax-scroll configuration".to_string(),
            String::new(),
            "# Engine".to_string(),
            format!("ease = {}", e.ease),
            format!("max_offset = {}", e.max_offset),
            format!("max_depth = {}", e.max_depth),
            format!("end_threshold = {}", e.end_threshold),
            format!("max_elapsed_ms = {}", e.max_elapsed_ms),
            format!("target_fpms = {}", e.target_fpms),
            String::new(),
            "# Terminal".to_string(),
            format!("row_px = {}", self.row_px),
            format!("frame_interval_ms = {}", self.frame_interval_ms),
            format!("wheel_step_px = {}", self.wheel_step_px),
            String::new(),
        ];
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/parallax-scroll/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("parallax-scroll").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_text() {
        let mut cfg = AppConfig::default();
        cfg.engine.ease = 0.05;
        cfg.row_px = 20.0;
        cfg.frame_interval_ms = 33;
        assert_eq!(AppConfig::parse_config(&cfg.serialise()), cfg);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = AppConfig::parse_config(
            "[engine]\nease = fast\nmax_depth = -3\nrow_px = 0\nframe_interval_ms = 9000\nunknown = 1\n",
        );
        let defaults = AppConfig::default();
        assert_eq!(cfg.engine.ease, defaults.engine.ease);
        assert_eq!(cfg.engine.max_depth, 10.0);
        assert_eq!(cfg.row_px, defaults.row_px);
        assert_eq!(cfg.frame_interval_ms, 250);
    }
}
