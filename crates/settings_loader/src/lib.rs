//! # Settings Loader
//!
//! Loads the workspace `settings.json` (endpoints of the analysis and assistant
//! services, the local data directory, and the API bind address) and layers
//! environment overrides on top.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Explicit file, then env overrides
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // Whatever is available: given path, ./settings.json, or defaults
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::resolve_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file. Keys absent from the file keep their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Tries the provided path, then the default location, then falls back to built-in
/// defaults. A file that exists but does not parse is still an error.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings_path) = path {
        if settings_file_exists(settings_path) {
            return load_settings(settings_path);
        }
        tracing::warn!(path = %settings_path.display(), "settings file not found, trying default location");
    }

    if default_settings_exist() {
        return load_default_settings();
    }

    tracing::debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

/// File (or defaults) plus environment overrides. This is what binaries call.
pub fn resolve_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = load_settings_with_fallback(path)?;
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// Applies `ANALYSIS_ENDPOINT`, `ASSISTANT_ENDPOINT`, `DATA_DIR`, `HOST` and `PORT`
/// as looked up through `lookup`.
pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("ANALYSIS_ENDPOINT") {
        settings.analysis_endpoint = v;
    }
    if let Some(v) = lookup("ASSISTANT_ENDPOINT") {
        settings.assistant_endpoint = v;
    }
    if let Some(v) = lookup("DATA_DIR") {
        settings.data_dir = v;
    }
    if let Some(v) = lookup("HOST") {
        settings.host = v;
    }
    if let Some(v) = lookup("PORT") {
        settings.port = v
            .parse()
            .with_context(|| format!("PORT must be a number, got '{v}'"))?;
    }
    Ok(settings)
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}
