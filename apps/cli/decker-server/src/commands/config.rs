use crate::error::AppError;
use crate::settings::Settings;

use common::ErrorLocation;

use std::fmt::Write as _;

/// Human readable summary of the effective settings, config as JSON.
#[track_caller]
pub fn describe(settings: &Settings) -> Result<String, AppError> {
    let json = serde_json::to_string_pretty(&settings.config).map_err(|e| AppError::App {
        message: format!("Failed to serialize config: {e}"),
        location: ErrorLocation::here(),
    })?;

    let mut out = String::new();
    let _ = writeln!(out, "config dir:  {}", settings.config_dir.display());
    let _ = writeln!(out, "workspace:   {}", settings.workspace.display());
    let _ = writeln!(out, "storage dir: {}", settings.storage_dir.display());
    out.push_str(&json);
    Ok(out)
}
