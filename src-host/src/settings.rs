//! Persisted host preferences.

use crate::error::CommandResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ts_rs::TS;

const SETTINGS_FILE: &str = "settings.json";

/// Settings structure for persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsData {
    pub keep_structure: bool,
    #[ts(optional)]
    pub last_output_dir: Option<String>,
    #[ts(optional)]
    pub prefix: Option<String>,
}

/// Default settings location: `<config dir>/unzipper/settings.json`
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("unzipper").join(SETTINGS_FILE))
}

/// Save settings to disk
pub async fn save_settings(path: &Path, settings: &SettingsData) -> CommandResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    tokio::fs::write(path, json).await?;

    Ok(())
}

/// Load settings from disk. A missing or unreadable file yields defaults.
pub async fn load_settings(path: &Path) -> CommandResult<SettingsData> {
    if !path.exists() {
        return Ok(SettingsData::default());
    }

    let contents = tokio::fs::read_to_string(path).await?;

    let settings = serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to parse settings file, using defaults");
        SettingsData::default()
    });

    Ok(settings)
}
