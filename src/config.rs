use std::path::{Path, PathBuf};

use crate::error::InfragraphError;
use crate::graph::LayoutConfig;

pub const APP_DIR: &str = "infragraph";
pub const LAYOUT_FILE: &str = "layout.json";

/// `<config dir>/infragraph/layout.json`, if the platform has a config dir.
pub fn default_layout_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(LAYOUT_FILE))
}

/// Explicit path first, then the per-user file if it exists, then defaults.
pub fn load_layout_config(explicit: Option<&Path>) -> Result<LayoutConfig, InfragraphError> {
    if let Some(path) = explicit {
        return read_layout_config(path);
    }

    match default_layout_path() {
        Some(path) if path.is_file() => read_layout_config(&path),
        _ => Ok(LayoutConfig::default()),
    }
}

pub fn read_layout_config(path: &Path) -> Result<LayoutConfig, InfragraphError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        InfragraphError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: LayoutConfig = serde_json::from_str(&text).map_err(|e| {
        InfragraphError::Config(format!("invalid layout config {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "layout config loaded");
    Ok(config)
}
