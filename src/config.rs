//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/promptchip/config.yaml`. Reads go
//! through a [`ConfigCache`] owned by whoever needs the config; there is no
//! process-wide cache.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::editable::DEFAULT_HISTORY_LIMIT;
use crate::error::ConfigError;

/// How long a cached config stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Metrics for the reference monospace layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Advance width of one character in pixels
    pub char_width: f64,
    /// Height of one visual line in pixels
    pub line_height: f64,
    /// Content box width; text wraps beyond it
    pub wrap_width: f64,
    /// Horizontal padding on each side of a chip's label
    pub chip_padding: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            wrap_width: 480.0,
            chip_padding: 6.0,
        }
    }
}

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: LayoutMetrics,
    /// Gap between a chip's right edge and the caret drawn after it
    pub caret_gap: f64,
    /// Text segments up to this many chars are hit-tested exhaustively
    pub linear_scan_limit: usize,
    /// Number of samples in the coarse pass for longer segments
    pub coarse_samples: usize,
    /// Undo steps kept per editor
    pub history_limit: usize,
    /// Maximum number of context snippets sent along with a rewrite
    pub context_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            caret_gap: 2.0,
            linear_scan_limit: 50,
            coarse_samples: 16,
            history_limit: DEFAULT_HISTORY_LIMIT,
            context_limit: 5,
        }
    }
}

impl EditorConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`, reporting failures
    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

/// Instance-owned config cache with a time-to-live.
///
/// While stopped every read goes to disk; after [`start`](Self::start) reads
/// are served from memory until the TTL runs out.
#[derive(Debug)]
pub struct ConfigCache {
    path: Option<PathBuf>,
    ttl: Duration,
    entry: Option<(Instant, EditorConfig)>,
    running: bool,
}

impl ConfigCache {
    /// Cache for the config file at `path` (`None` = defaults only)
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            ttl: DEFAULT_CACHE_TTL,
            entry: None,
            running: false,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin caching, loading the config immediately
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.running = true;
        self.entry = Some((now, self.read()));
        tracing::debug!(ttl_secs = self.ttl.as_secs(), "config cache started");
    }

    /// Stop caching and drop the cached value
    pub fn stop(&mut self) {
        self.running = false;
        self.entry = None;
        tracing::debug!("config cache stopped");
    }

    /// Force the next read to hit disk
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn get(&mut self) -> EditorConfig {
        self.get_at(Instant::now())
    }

    /// Current config as of `now`
    pub fn get_at(&mut self, now: Instant) -> EditorConfig {
        if !self.running {
            return self.read();
        }
        if let Some((loaded_at, config)) = &self.entry {
            if now.saturating_duration_since(*loaded_at) < self.ttl {
                return config.clone();
            }
            tracing::debug!("config cache expired, reloading");
        }
        let config = self.read();
        self.entry = Some((now, config.clone()));
        config
    }

    fn read(&self) -> EditorConfig {
        match &self.path {
            Some(path) => EditorConfig::load_from(path),
            None => EditorConfig::default(),
        }
    }
}
