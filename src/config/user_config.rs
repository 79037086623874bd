//! User configuration file parsing

use crate::config::catalog::{Book, CityWeather, Media};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub settings: Option<Settings>,
    /// Cities to add, or to replace when the name matches a built-in one
    #[serde(default)]
    pub weather: Vec<CityWeather>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub rest_port: Option<u16>,
}
