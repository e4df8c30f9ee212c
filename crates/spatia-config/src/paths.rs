//! Platform-specific configuration paths.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/spatia/` (Linux), `~/Library/Application Support/spatia/` (macOS), `%APPDATA%\spatia\` (Windows)
//! - **System config**: `/etc/spatia/` (Linux), `/Library/Application Support/spatia/` (macOS)
//!
//! Both directories hold `config.toml` and, optionally, a `profiles.toml`
//! catalog.
//!
//! # Example
//!
//! ```rust,no_run
//! use spatia_config::{EngineConfig, paths};
//!
//! let config = match paths::find_config() {
//!     Some(path) => EngineConfig::load(path).unwrap(),
//!     None => EngineConfig::default(),
//! };
//! ```

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "spatia";

/// Engine configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// User catalog file name.
pub const PROFILES_FILE: &str = "profiles.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user configuration file path (which may not exist).
pub fn user_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the user catalog file path (which may not exist).
pub fn user_profiles_file() -> PathBuf {
    user_config_dir().join(PROFILES_FILE)
}

/// Returns the system-wide configuration directory.
pub fn system_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/etc").join(APP_NAME)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support").join(APP_NAME)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
    }
}

/// Find the configuration file to use.
///
/// Searches the user directory, then the system directory.
pub fn find_config() -> Option<PathBuf> {
    [user_config_file(), system_config_dir().join(CONFIG_FILE)]
        .into_iter()
        .find(|path| path.is_file())
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}
