use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::ThemeMode;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,
    #[serde(default = "default_photo_endpoint")]
    pub photo_endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_desktop_notifications")]
    pub desktop_notifications: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides for the "light" and "dark" palettes, or extra named ones
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            search_url: default_search_url(),
            metadata_endpoint: default_metadata_endpoint(),
            photo_endpoint: default_photo_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            desktop_notifications: default_desktop_notifications(),
            log_level: default_log_level(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            accent: default_accent(),
        }
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            accent: "magenta".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self::default()
    }
}

// Default value functions
fn default_database_path() -> String {
    // This is a fallback - actual profile will be determined at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("startpage.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/startpage/startpage.db".to_string()
    }
}

fn default_search_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_metadata_endpoint() -> String {
    "https://api.microlink.io/".to_string()
}

fn default_photo_endpoint() -> String {
    "https://api.unsplash.com/photos/random".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_desktop_notifications() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_accent() -> String {
    "lightmagenta".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and database paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_or_create(&config_path, profile)
    }

    /// Read `config_path` if it exists, otherwise write a default one there.
    /// A blank `database_path` resolves to the profile's data directory.
    pub fn load_or_create(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let mut config = Self::read_file(config_path)?;
            if config.database_path.trim().is_empty() {
                config.database_path = Self::default_database_path_for_profile(profile);
            }
            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            let save_result = config.save_to_path(config_path);
            if let Err(ref e) = save_result {
                eprintln!("ERROR: Failed to save config file: {}", e);
                eprintln!("Config path: {:?}", config_path);
            }
            save_result?;
            Ok(config)
        }
    }

    /// Load an explicit config file (`--config`); missing fields take defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        if config.database_path.trim().is_empty() {
            config.database_path = default_database_path();
        }
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("startpage.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/startpage-dev/startpage.db".to_string(),
                utils::Profile::Prod => "~/.local/share/startpage/startpage.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Log file sits next to the database
    pub fn get_log_path(&self) -> PathBuf {
        self.get_database_path()
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join("startpage.log")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Palette for the stored theme setting; "system" follows the terminal
    pub fn theme_for(&self, mode: ThemeMode) -> Theme {
        let name = match mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => {
                if terminal_prefers_light() {
                    "light"
                } else {
                    "dark"
                }
            }
        };
        if let Some(theme) = self.themes.get(name) {
            return theme.clone();
        }
        match name {
            "light" => Theme::light(),
            _ => Theme::dark(),
        }
    }
}

/// `COLORFGBG` is "fg;bg" with ANSI indices; a light background is 7 or 9..=15
fn terminal_prefers_light() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .is_some_and(background_is_light)
}

fn background_is_light(colorfgbg: &str) -> bool {
    colorfgbg
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg == 7 || (9..=15).contains(&bg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_takes_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.search_url, "https://www.google.com/search");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.desktop_notifications);
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn theme_override_replaces_preset() {
        let config: Config = toml::from_str(
            r#"
            [themes.dark]
            fg = "green"
            "#,
        )
        .unwrap();
        let theme = config.theme_for(ThemeMode::Dark);
        assert_eq!(theme.fg, "green");
        assert_eq!(theme.bg, "black");
        assert_eq!(config.theme_for(ThemeMode::Light), Theme::light());
    }

    #[test]
    fn colorfgbg_background_detection() {
        assert!(background_is_light("0;15"));
        assert!(background_is_light("0;default;7"));
        assert!(!background_is_light("15;0"));
        assert!(!background_is_light("garbage"));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.search_url = "https://duckduckgo.com/".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.search_url, "https://duckduckgo.com/");
        assert_eq!(loaded.photo_endpoint, config.photo_endpoint);
    }

    #[test]
    fn edited_database_path_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let created = Config::load_or_create(&path, utils::Profile::Dev).unwrap();
        assert!(path.exists());
        assert!(created.database_path.ends_with("startpage.db"));

        fs::write(
            &path,
            "database_path = \"/srv/pages/custom.db\"\nsearch_url = \"https://duckduckgo.com/\"\n",
        )
        .unwrap();
        let loaded = Config::load_or_create(&path, utils::Profile::Dev).unwrap();
        assert_eq!(loaded.database_path, "/srv/pages/custom.db");
        assert_eq!(loaded.search_url, "https://duckduckgo.com/");
    }

    #[test]
    fn missing_database_path_uses_profile_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let dev = Config::load_or_create(&path, utils::Profile::Dev).unwrap();
        assert_eq!(
            dev.database_path,
            Config::default_database_path_for_profile(utils::Profile::Dev)
        );
        assert_eq!(dev.log_level, "debug");

        let explicit = Config::load_from_path(&path).unwrap();
        assert!(!explicit.database_path.is_empty());
    }

    #[test]
    fn log_path_is_beside_database() {
        let mut config = Config::default();
        config.database_path = "/tmp/sp/startpage.db".to_string();
        assert_eq!(config.get_log_path(), PathBuf::from("/tmp/sp/startpage.log"));
    }
}
