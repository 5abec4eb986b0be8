//! Configuration module for Rarefactor
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "RAREFACTOR_SETTINGS_PATH";

/// Load settings from the first file found, falling back to defaults.
///
/// An explicit path wins, then `RAREFACTOR_SETTINGS_PATH`, then the default
/// locations. Environment overrides are applied in every case.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        info!("Loading settings from: {}", path.display());
        return finish(Settings::from_file(path)?);
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            return finish(Settings::from_file(&path)?);
        }
    }

    for path in default_paths() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            return finish(Settings::from_file(&path)?);
        }
    }

    info!("No settings file found, using defaults");
    finish(Settings::default())
}

fn finish(mut settings: Settings) -> Result<Settings> {
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("rarefactor/settings.yml"));
    }
    paths
}
