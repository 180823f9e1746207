//! Subcommand implementations.

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigManager, ResolveOptions, Settings, resolve_settings};

/// Configuration check command handler.
pub mod check;

/// Language listing command handler.
pub mod languages;

/// Bot runner.
pub mod run;

/// One-shot name translation command handler.
pub mod translate;

/// Loads the config file (default location unless `path` is given) and
/// resolves it into validated settings.
pub fn load_settings(path: Option<&Path>, options: &ResolveOptions) -> Result<Settings> {
    let manager = path.map_or_else(ConfigManager::new, ConfigManager::with_path);
    let config_file = manager.load()?;
    resolve_settings(options, &config_file)
}
