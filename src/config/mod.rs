//! Configuration system for mcp-handson
//!
//! Provides a 3-tier configuration hierarchy:
//! 1. Command-line flags (highest priority)
//! 2. User config file
//! 3. Built-in defaults (lowest priority)

pub mod catalog;
mod defaults;
mod loader;
mod user_config;

pub use catalog::{Book, CityWeather, Condition, Media};
pub use defaults::{default_books, default_media, default_weather};
pub use loader::ConfigLoader;
pub use user_config::{Settings, UserConfig};
