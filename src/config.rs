use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::GridgapError;
use crate::provider::jolpica::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_S};
use crate::provider::SessionCache;
use crate::pipeline::SessionRequest;

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "gridgap";

pub const DEFAULT_FIRST_YEAR: u16 = 2018;
pub const DEFAULT_LAST_YEAR: u16 = 2024;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_s: u64,
    /// Overrides the platform cache directory
    pub cache_dir: Option<PathBuf>,
    pub first_year: u16,
    pub last_year: u16,
    /// The session shown when the window was last closed
    pub last_selection: Option<SessionRequest>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_s: DEFAULT_TIMEOUT_S,
            cache_dir: None,
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            last_selection: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the saved config, falling back to defaults when there is none or it can't be read.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring config file {:?}: {}", path, e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, GridgapError> {
        let file =
            std::fs::File::open(path).map_err(|e| GridgapError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| GridgapError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), GridgapError> {
        let config_path = Self::config_path().ok_or(GridgapError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), GridgapError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GridgapError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| GridgapError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| GridgapError::ConfigSerializeError { source: e })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s)
    }

    pub fn session_cache(&self) -> Result<SessionCache, GridgapError> {
        match &self.cache_dir {
            Some(dir) => Ok(SessionCache::new(dir.clone())),
            None => SessionCache::new_default(),
        }
    }

    /// Selectable seasons, newest first
    pub fn years(&self) -> Vec<u16> {
        let (first, last) = if self.first_year <= self.last_year {
            (self.first_year, self.last_year)
        } else {
            (self.last_year, self.first_year)
        };
        (first..=last).rev().collect()
    }
}
