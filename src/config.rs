//! Configuration for the picker.
//!
//! Layers, lowest to highest priority:
//! 1. Built-in defaults
//! 2. TOML file: `--config <path>` or `config.toml` in the platform config dir
//! 3. Environment (`PHOTO_PICKER_*`, a `.env` file is honored via dotenvy)
//!
//! Missing files are ignored. Unparseable values are logged and skipped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";
pub const DEFAULT_APP_NAME: &str = "photo-picker";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolved settings used by the provider and the terminal front-end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickerConfig {
    pub provider: ProviderConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub api_base: String,
    /// Client key sent as `Authorization: Client-ID <key>`.
    pub access_key: Option<String>,
    /// Application name used for referral attribution.
    pub app_name: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Quiet period after the last keystroke before a query is issued.
    pub debounce: Duration,
    /// Fraction of the list extent that must be scrolled past to load more.
    pub scroll_threshold: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_key: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            scroll_threshold: 0.8,
        }
    }
}

/// On-disk shape; every field optional so partial files merge over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    provider: ProviderSection,
    ui: UiSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderSection {
    api_base: Option<String>,
    access_key: Option<String>,
    app_name: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UiSection {
    debounce_ms: Option<u64>,
    scroll_threshold: Option<f32>,
}

impl PickerConfig {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `path` that cannot be read is an error; the implicit
    /// platform config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        match path {
            Some(p) => cfg.merge_file(p)?,
            None => {
                if let Some(p) = default_config_path()
                    && p.exists()
                {
                    cfg.merge_file(&p)?;
                }
            }
        }

        cfg.merge_env();
        Ok(cfg)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&body).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        self.apply(file);
        Ok(())
    }

    fn apply(&mut self, file: ConfigFile) {
        let ConfigFile { provider, ui } = file;
        if let Some(base) = provider.api_base {
            self.provider.api_base = base;
        }
        if let Some(key) = provider.access_key.filter(|k| !k.trim().is_empty()) {
            self.provider.access_key = Some(key);
        }
        if let Some(name) = provider.app_name {
            self.provider.app_name = name;
        }
        if let Some(secs) = provider.timeout_secs {
            self.provider.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = ui.debounce_ms {
            self.ui.debounce = Duration::from_millis(ms);
        }
        if let Some(threshold) = ui.scroll_threshold {
            self.set_scroll_threshold(threshold);
        }
    }

    /// Apply `PHOTO_PICKER_*` environment overrides.
    pub fn merge_env(&mut self) {
        if let Ok(base) = dotenvy::var("PHOTO_PICKER_API_BASE") {
            self.provider.api_base = base;
        }

        if let Ok(key) = dotenvy::var("PHOTO_PICKER_ACCESS_KEY")
            && !key.trim().is_empty()
        {
            self.provider.access_key = Some(key);
        }

        if let Ok(name) = dotenvy::var("PHOTO_PICKER_APP_NAME") {
            self.provider.app_name = name;
        }

        if let Ok(val) = dotenvy::var("PHOTO_PICKER_TIMEOUT_SECS") {
            match val.parse() {
                Ok(secs) => self.provider.timeout = Duration::from_secs(secs),
                Err(_) => warn!("ignoring invalid PHOTO_PICKER_TIMEOUT_SECS={val}"),
            }
        }

        if let Ok(val) = dotenvy::var("PHOTO_PICKER_DEBOUNCE_MS") {
            match val.parse() {
                Ok(ms) => self.ui.debounce = Duration::from_millis(ms),
                Err(_) => warn!("ignoring invalid PHOTO_PICKER_DEBOUNCE_MS={val}"),
            }
        }

        if let Ok(val) = dotenvy::var("PHOTO_PICKER_SCROLL_THRESHOLD") {
            match val.parse() {
                Ok(t) => self.set_scroll_threshold(t),
                Err(_) => warn!("ignoring invalid PHOTO_PICKER_SCROLL_THRESHOLD={val}"),
            }
        }
    }

    fn set_scroll_threshold(&mut self, threshold: f32) {
        if threshold > 0.0 && threshold <= 1.0 {
            self.ui.scroll_threshold = threshold;
        } else {
            warn!("scroll_threshold must be in (0, 1], got {threshold}");
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "photo-picker", "photo-picker")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
