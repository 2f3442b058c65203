//! Storage directory resolution.
//!
//! Log files and generated pages live in the storage directory. When no
//! override is configured it defaults to `<data dir>/decker-server`.

use crate::config::{APP_DIR_NAME, DeckerConfig};
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::path::{Path, PathBuf};

use log::debug;

const HOME_PLACEHOLDERS: [&str; 2] = ["${HOME}", "${home}"];
const WORKSPACE_PLACEHOLDERS: [&str; 2] = ["${workspaceFolder}", "${workspaceRoot}"];

/// Substitute home and workspace placeholders in a configured path.
///
/// A leading `~` expands to `home`. Workspace placeholders are left
/// untouched when no workspace is open.
pub fn expand_placeholders(raw: &str, home: &Path, workspace: Option<&Path>) -> String {
    let home_str = home.to_string_lossy();

    let mut expanded = raw.to_string();
    for placeholder in HOME_PLACEHOLDERS {
        expanded = expanded.replace(placeholder, &home_str);
    }

    if let Some(rest) = expanded.strip_prefix('~') {
        expanded = format!("{home_str}{rest}");
    }

    if let Some(workspace) = workspace {
        let workspace_str = workspace.to_string_lossy();
        for placeholder in WORKSPACE_PLACEHOLDERS {
            expanded = expanded.replace(placeholder, &workspace_str);
        }
    }

    expanded
}

/// Resolve the storage directory for this session.
#[track_caller]
pub fn storage_directory(
    config: &DeckerConfig,
    workspace: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    match &config.storage_path {
        Some(raw) if !raw.trim().is_empty() => {
            let home = dirs::home_dir().ok_or_else(|| ConfigError::StorageDirectory {
                location: ErrorLocation::here(),
                reason: format!("Cannot expand '{raw}': home directory is unknown"),
            })?;

            let expanded = PathBuf::from(expand_placeholders(raw, &home, workspace));
            debug!("Storage directory override: {}", expanded.display());
            Ok(expanded)
        }
        _ => dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| ConfigError::StorageDirectory {
                location: ErrorLocation::here(),
                reason: "No platform data directory available".to_string(),
            }),
    }
}
