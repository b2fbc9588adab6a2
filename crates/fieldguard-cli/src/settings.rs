use std::path::{Path, PathBuf};

use fieldguard_sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Settings file picked up from the working directory when `--config` is
/// not given.
pub const DEFAULT_SETTINGS_FILE: &str = "fieldguard.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub sync: SyncSettings,
}

/// `[sync]` table. The API token is never read from this file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSettings {
    pub api_domain: Option<String>,
    pub project_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line; these win over everything else.
#[derive(Debug, Clone, Default)]
pub struct SyncOverrides {
    pub api_domain: Option<String>,
    pub project_id: Option<String>,
}

/// Load settings from `path`, or from `fieldguard.toml` when present.
///
/// An explicit path that does not exist is an error; a missing default
/// file just yields empty settings.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    if !explicit && !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let settings = toml::from_str(&content).map_err(|source| CliError::Settings {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(event = "settings_loaded", path = %path.display());
    Ok(settings)
}

/// Build the sync configuration.
///
/// Precedence per value: command-line flag, then `FIELDGUARD_*`
/// environment variable, then the settings file, then the built-in default.
pub fn resolve_sync_config(
    settings: &SyncSettings,
    overrides: &SyncOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SyncConfig, CliError> {
    let config = SyncConfig::from_lookup(|name| match name {
        "FIELDGUARD_API_DOMAIN" => overrides
            .api_domain
            .clone()
            .or_else(|| env(name))
            .or_else(|| settings.api_domain.clone()),
        "FIELDGUARD_PROJECT_ID" => overrides
            .project_id
            .clone()
            .or_else(|| env(name))
            .or_else(|| settings.project_id.clone()),
        "FIELDGUARD_TIMEOUT_SECS" => env(name).or_else(|| settings.timeout_secs.map(|t| t.to_string())),
        _ => env(name),
    })?;
    Ok(config)
}
