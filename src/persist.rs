use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::models::AppSettings;
use crate::store::ToolState;

/// The persisted subset of the store: settings plus per-tool state. Catalog
/// data and load/error flags are session-only and never written out.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default)]
    pub tool_states: HashMap<String, ToolState>,
}

/// Read a snapshot. A missing file is `Ok(None)`; an unreadable or corrupt
/// file is an error, so the caller decides whether to start fresh.
pub fn load(path: &Path) -> Result<Option<PersistedState>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory: {}", parent.display()))?;
        }
    }

    let content = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    Ok(())
}
