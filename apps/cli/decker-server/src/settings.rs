//! Effective settings for one run: config file, flags and derived directories.

use crate::cli::Overrides;
use crate::error::AppError;

use decker_core::config::{DeckerConfig, default_config_dir, storage_directory};

use common::ErrorLocation;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;

use log::debug;

/// Sub-directory of the storage directory holding generated pages.
const PAGES_DIR_NAME: &str = "pages";

#[derive(Debug, Clone)]
pub struct Settings {
    pub config: DeckerConfig,
    pub config_dir: PathBuf,
    pub workspace: PathBuf,
    pub storage_dir: PathBuf,
}

impl Settings {
    /// Load `config.json`, apply `overrides` and resolve directories.
    ///
    /// The storage directory is created if missing.
    #[track_caller]
    pub fn load(overrides: &Overrides) -> Result<Self, AppError> {
        let config_dir = match &overrides.config_dir {
            Some(dir) => dir.clone(),
            None => default_config_dir().ok_or_else(|| AppError::App {
                message: "No platform config directory available, use --config-dir".to_string(),
                location: ErrorLocation::here(),
            })?,
        };

        let mut config = DeckerConfig::load(&config_dir)?;
        overrides.apply(&mut config)?;

        let workspace = match &overrides.workspace {
            Some(dir) => dir.clone(),
            None => env::current_dir().map_err(|e| AppError::App {
                message: format!("Failed to read the current directory: {e}"),
                location: ErrorLocation::here(),
            })?,
        };

        let storage_dir = storage_directory(&config, Some(&workspace))?;
        create_dir_all(&storage_dir).map_err(|e| AppError::App {
            message: format!(
                "Failed to create storage directory {}: {e}",
                storage_dir.display()
            ),
            location: ErrorLocation::here(),
        })?;

        debug!(
            "Settings: config dir {}, workspace {}, storage {}",
            config_dir.display(),
            workspace.display(),
            storage_dir.display()
        );

        Ok(Self {
            config,
            config_dir,
            workspace,
            storage_dir,
        })
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.storage_dir.join(PAGES_DIR_NAME)
    }
}
