//! Configuration loader with 3-tier precedence
//!
//! Priority order (highest to lowest):
//! 1. Command-line flags (applied by the caller)
//! 2. User config (.mcp-handson.toml, $MCP_HANDSON_CONFIG, ~/.config/mcp-handson/config.toml)
//! 3. Built-in defaults

use crate::config::catalog::{Book, CityWeather, Media};
use crate::config::defaults::{
    default_books, default_media, default_weather, DEFAULT_DATA_FILE, DEFAULT_REST_PORT,
};
use crate::config::{Settings, UserConfig};
use crate::types::HandsOnError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader {
    user_config: Option<UserConfig>,
    source: Option<PathBuf>,
    weather: Vec<CityWeather>,
    books: Vec<Book>,
    media: Vec<Media>,
}

impl ConfigLoader {
    /// Load defaults plus the first user config file found
    pub fn new() -> Result<Self, HandsOnError> {
        match Self::find_user_config() {
            Some(path) => Self::from_path(&path),
            None => {
                debug!("No user config file found");
                Ok(Self::from_user_config(None))
            }
        }
    }

    /// Load defaults plus the user config at `path`
    pub fn from_path(path: &Path) -> Result<Self, HandsOnError> {
        debug!("Loading user config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| HandsOnError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: UserConfig = toml::from_str(&content)
            .map_err(|e| HandsOnError::ConfigError(format!("Failed to parse config: {}", e)))?;

        let mut loader = Self::from_user_config(Some(config));
        loader.source = Some(path.to_path_buf());
        Ok(loader)
    }

    pub fn from_user_config(user_config: Option<UserConfig>) -> Self {
        let mut weather = default_weather();
        let mut books = default_books();
        let mut media = default_media();

        if let Some(user) = &user_config {
            for city in &user.weather {
                match weather.iter_mut().find(|w| w.city == city.city) {
                    Some(existing) => *existing = city.clone(),
                    None => weather.push(city.clone()),
                }
            }
            books.extend(user.books.iter().cloned());
            media.extend(user.media.iter().cloned());
        }

        Self {
            user_config,
            source: None,
            weather,
            books,
            media,
        }
    }

    fn find_user_config() -> Option<PathBuf> {
        let mut candidates = Vec::new();

        // Project-specific config
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(".mcp-handson.toml"));
        }

        if let Ok(config_path) = std::env::var("MCP_HANDSON_CONFIG") {
            candidates.push(PathBuf::from(config_path));
        }

        // User-global config
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("mcp-handson").join("config.toml"));
        }

        candidates.into_iter().find(|p| p.exists())
    }

    /// Path of the user config file in use, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn data_file(&self) -> PathBuf {
        self.settings()
            .and_then(|s| s.data_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    pub fn rest_port(&self) -> u16 {
        self.settings()
            .and_then(|s| s.rest_port)
            .unwrap_or(DEFAULT_REST_PORT)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.settings().and_then(|s| s.log_level.as_deref())
    }

    pub fn weather(&self) -> &[CityWeather] {
        &self.weather
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn media(&self) -> &[Media] {
        &self.media
    }

    fn settings(&self) -> Option<&Settings> {
        self.user_config.as_ref().and_then(|c| c.settings.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::Condition;
    use std::io::Write;

    #[test]
    fn test_defaults_without_user_config() {
        let loader = ConfigLoader::from_user_config(None);
        assert_eq!(loader.data_file(), PathBuf::from("tasks.json"));
        assert_eq!(loader.rest_port(), 3000);
        assert!(loader.log_level().is_none());
        assert_eq!(loader.weather().len(), 5);
        assert_eq!(loader.books().len(), 3);
    }

    #[test]
    fn test_user_config_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[settings]
data_file = "/tmp/my-tasks.json"
rest_port = 8080
log_level = "debug"

[[weather]]
city = "Tokyo"
temp = 5
condition = "snow"
humidity = 40

[[weather]]
city = "Nagoya"
temp = 20
condition = "cloudy"
humidity = 58

[[books]]
id = "4"
title = "Rust for MCP"
author = "Jiro Tanaka"
year = 2025
description = "Writing MCP servers in Rust"
"#
        )
        .unwrap();

        let loader = ConfigLoader::from_path(file.path()).unwrap();
        assert_eq!(loader.source(), Some(file.path()));
        assert_eq!(loader.data_file(), PathBuf::from("/tmp/my-tasks.json"));
        assert_eq!(loader.rest_port(), 8080);
        assert_eq!(loader.log_level(), Some("debug"));

        let tokyo = loader.weather().iter().find(|w| w.city == "Tokyo").unwrap();
        assert_eq!(tokyo.condition, Condition::Snow);
        assert_eq!(loader.weather().len(), 6);
        assert_eq!(loader.books().len(), 4);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[weather]]\ncity = 3").unwrap();

        let result = ConfigLoader::from_path(file.path());
        assert!(matches!(result, Err(HandsOnError::ConfigError(_))));
    }
}
