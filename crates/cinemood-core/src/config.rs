use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use tracing::warn;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_ROTATION_SECS: u64 = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tmdb_api_key: Option<String>,
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_rotation_secs")]
    pub rotation_secs: u64,
}

fn default_tmdb_base_url() -> String {
    DEFAULT_TMDB_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_rotation_secs() -> u64 {
    DEFAULT_ROTATION_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            backend_url: default_backend_url(),
            rotation_secs: default_rotation_secs(),
        }
    }

    /// Load the config file, then apply `TMDB_API_KEY` and `CINEMOOD_BACKEND_URL`.
    /// A missing, unreadable or malformed file falls back to the defaults; the
    /// environment overrides apply either way.
    pub fn load_or_default() -> Self {
        match Self::get_config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!(error = %e, "no config directory, using defaults");
                let mut config = Self::new();
                config.apply_env();
                config
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        let mut config = Self::load_from(path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path.display(), "could not load config, using defaults");
            Self::new()
        });
        config.apply_env();
        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.trim().is_empty() {
                self.tmdb_api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("CINEMOOD_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend_url = url;
            }
        }
    }

    /// The key sent to the metadata API. Empty when unconfigured, which the API rejects.
    pub fn api_key(&self) -> &str {
        self.tmdb_api_key.as_deref().unwrap_or("")
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("cinemood").join("config.json"))
    }
}
