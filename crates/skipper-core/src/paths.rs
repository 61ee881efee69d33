//! Filesystem locations for Skipper state.
//!
//! Everything lives under `~/.skipper` so a user can inspect or wipe the
//! whole footprint in one place.

use std::path::PathBuf;

/// Directory name under the user's home directory.
const APP_DIR_NAME: &str = ".skipper";

/// Root directory for configuration and logs.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Path of the executor configuration file.
pub fn config_file() -> PathBuf {
    app_dir().join("config.toml")
}

/// Directory that holds rotating log files.
pub fn logs_dir() -> PathBuf {
    app_dir().join("logs")
}
