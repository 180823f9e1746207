//! XDG-style path utilities for the configuration directory.

use std::path::PathBuf;

/// Returns the configuration directory for nickbot.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/nickbot` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/nickbot` otherwise
/// 3. `./.config/nickbot` if the home directory cannot be determined
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("nickbot"),
        |xdg| PathBuf::from(xdg).join("nickbot"),
    )
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
