//! Where promptchip keeps its files on disk
//!
//! Everything lives in one application directory, `$XDG_CONFIG_HOME/promptchip`
//! or `~/.config/promptchip` on Unix and macOS and `%APPDATA%\promptchip` on
//! Windows:
//!
//! ```text
//! promptchip/
//!   config.yaml     editor config
//!   settings.json   API keys and other settings
//!   logs/           daily rolling log files
//! ```

use std::path::PathBuf;

use crate::error::ConfigError;

const APP_DIR: &str = "promptchip";

/// File name prefix of the rolling log files
pub const LOG_FILE_NAME: &str = "promptchip.log";

/// The application directory
pub fn config_dir() -> Option<PathBuf> {
    base_dir().map(|base| base.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn base_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

// macOS follows the XDG layout too rather than ~/Library/Application Support
#[cfg(not(target_os = "windows"))]
fn base_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory and its parents if needed
pub fn ensure_logs_dir() -> Result<PathBuf, ConfigError> {
    let dir = logs_dir().ok_or(ConfigError::NoConfigDir)?;
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
