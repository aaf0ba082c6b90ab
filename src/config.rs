//! Application configuration management.
//!
//! This module handles the persistent configuration for livepad: the work
//! directory that holds imported audio and preset files, the default play
//! mode applied at import, and a couple of behavior toggles. Configuration
//! is stored in the user's config directory (typically
//! ~/.config/livepad/config.toml).

use crate::clip::PlayMode;
use crate::constants::{MUSIC_DIR, PRESETS_DIR};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_play_mode")]
    pub default_play_mode: String,
    #[serde(default = "default_autoload_recent")]
    pub autoload_recent: bool,
    #[serde(default = "default_normalize_clip_names")]
    pub normalize_clip_names: bool,
}

fn default_work_dir() -> String {
    let base = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("livepad").to_string_lossy().to_string()
}

fn default_play_mode() -> String {
    "once".to_string()
}

fn default_autoload_recent() -> bool {
    true
}

fn default_normalize_clip_names() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            work_dir: default_work_dir(),
            default_play_mode: default_play_mode(),
            autoload_recent: default_autoload_recent(),
            normalize_clip_names: default_normalize_clip_names(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("livepad")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("livepad")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            // Return default config instead of error
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// The work dir with a leading tilde expanded.
    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.work_dir).to_string())
    }

    /// Where imported audio files live.
    pub fn music_dir(&self) -> PathBuf {
        self.work_dir_path().join(MUSIC_DIR)
    }

    /// Where preset files live.
    pub fn preset_dir(&self) -> PathBuf {
        self.work_dir_path().join(PRESETS_DIR)
    }

    /// The configured import-time play mode.
    pub fn import_play_mode(&self) -> Result<PlayMode, Box<dyn Error>> {
        self.default_play_mode
            .parse::<PlayMode>()
            .map_err(|e| format!("Bad default_play_mode in config: {e}").into())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "work_dir" => self.work_dir = value.to_string(),
            "default_play_mode" => {
                value.parse::<PlayMode>()?;
                self.default_play_mode = value.to_lowercase();
            }
            "autoload_recent" => {
                self.autoload_recent = value
                    .parse::<bool>()
                    .map_err(|_| "Value must be 'true' or 'false'")?;
            }
            "normalize_clip_names" => {
                self.normalize_clip_names = value
                    .parse::<bool>()
                    .map_err(|_| "Value must be 'true' or 'false'")?;
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Use a mutex to ensure tests that modify environment variables don't run concurrently
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_work_dir_is_not_empty() {
        assert!(!default_work_dir().is_empty());
        assert!(default_work_dir().ends_with("livepad"));
    }

    #[test]
    fn test_config_new_defaults() {
        let config = Config::new();
        assert_eq!(config.default_play_mode, "once");
        assert!(config.autoload_recent);
        assert!(!config.normalize_clip_names);
    }

    #[test]
    fn test_derived_dirs_hang_off_work_dir() {
        let mut config = Config::new();
        config.work_dir = "/tmp/livepad-test".to_string();
        assert_eq!(config.music_dir(), PathBuf::from("/tmp/livepad-test/music"));
        assert_eq!(
            config.preset_dir(),
            PathBuf::from("/tmp/livepad-test/presets")
        );
    }

    #[test]
    fn test_import_play_mode_parses() {
        let mut config = Config::new();
        assert_eq!(config.import_play_mode().unwrap(), PlayMode::Once);
        config.default_play_mode = "loop".to_string();
        assert_eq!(config.import_play_mode().unwrap(), PlayMode::Loop);
        config.default_play_mode = "sideways".to_string();
        assert!(config.import_play_mode().is_err());
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::new();

        config.set_value("work_dir", "/srv/livepad").unwrap();
        assert_eq!(config.work_dir, "/srv/livepad");

        config.set_value("default_play_mode", "Loop").unwrap();
        assert_eq!(config.default_play_mode, "loop");
        assert!(config.set_value("default_play_mode", "shuffle").is_err());

        config.set_value("autoload_recent", "false").unwrap();
        assert!(!config.autoload_recent);
        assert!(config.set_value("autoload_recent", "maybe").is_err());

        config.set_value("normalize_clip_names", "true").unwrap();
        assert!(config.normalize_clip_names);

        assert!(config.set_value("unknown_key", "value").is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let original_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let mut config = Config::new();
        config.work_dir = "/tmp/livepad-roundtrip".to_string();
        config.save().unwrap();

        let config_path = Config::config_path().unwrap();
        assert!(config_path.exists());
        assert!(config_path.starts_with(temp_dir.path().join("livepad")));

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.work_dir, "/tmp/livepad-roundtrip");
        assert_eq!(loaded.default_play_mode, "once");

        // Clean up - restore original value if it existed
        unsafe {
            if let Some(original) = original_xdg {
                std::env::set_var("XDG_CONFIG_HOME", original);
            } else {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn test_config_exists() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let original_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let expected_path = temp_dir.path().join("livepad").join("config.toml");
        assert!(!expected_path.exists());
        assert!(!Config::exists().unwrap());

        let config = Config::new();
        config.save().unwrap();

        assert!(expected_path.exists());
        assert!(Config::exists().unwrap());

        unsafe {
            if let Some(original) = original_xdg {
                std::env::set_var("XDG_CONFIG_HOME", original);
            } else {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}
