pub mod storage;

pub use storage::{expand_placeholders, storage_directory};

use crate::error::config::ConfigError;
use crate::{DECKER_BINARY, DEFAULT_SERVER_PORT};

use common::ErrorLocation;

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const APP_DIR_NAME: &str = "decker-server";

// ============================================
// ENUMS WITH DEFAULTS
// ============================================

/// How port occupancy is checked during negotiation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// `lsof` / `Get-NetTCPConnection`, judged by exit status.
    #[default]
    Command,
    /// In-process lookup of the OS socket table.
    SocketTable,
}

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutableConfig {
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for ExecutableConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub autostart: bool,
    #[serde(default = "default_max_port_attempts")]
    pub max_port_attempts: u32,
    #[serde(default)]
    pub probe: ProbeKind,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            autostart: false,
            max_port_attempts: default_max_port_attempts(),
            probe: ProbeKind::default(),
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckerConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub executable: ExecutableConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Sub-folder of the workspace holding the decks; relative or absolute.
    #[serde(default)]
    pub deck_folder: Option<String>,

    /// Override for the storage directory; supports `~`, `${HOME}` and
    /// `${workspaceFolder}` placeholders.
    #[serde(default)]
    pub storage_path: Option<String>,
}

impl Default for DeckerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            executable: ExecutableConfig::default(),
            server: ServerConfig::default(),
            deck_folder: None,
            storage_path: None,
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_command() -> String {
    DECKER_BINARY.to_string()
}
fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}
fn default_max_port_attempts() -> u32 {
    100
}
fn default_ready_timeout_secs() -> u64 {
    20
}

/// Platform config directory for this tool, e.g. `~/.config/decker-server`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

// ============================================
// IMPLEMENTATION
// ============================================

impl DeckerConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// Returns defaults when the file does not exist and an error when it
    /// exists but cannot be read, parsed or validated.
    #[track_caller]
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::here(),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: DeckerConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::here(),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json (temp file + rename).
    #[track_caller]
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::here(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        if self.executable.command.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: "executable.command cannot be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: "server.port must be between 1 and 65535".to_string(),
            });
        }

        if self.server.max_port_attempts == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: "server.max_port_attempts must be at least 1".to_string(),
            });
        }

        if let Some(folder) = &self.deck_folder
            && folder.trim().is_empty()
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: "deck_folder cannot be an empty string".to_string(),
            });
        }

        Ok(())
    }

    /// Directory decker runs in: the deck folder when configured, else the workspace.
    ///
    /// An absolute deck folder replaces the workspace entirely.
    pub fn working_directory(&self, workspace: &Path) -> PathBuf {
        match &self.deck_folder {
            Some(folder) => workspace.join(folder),
            None => workspace.to_path_buf(),
        }
    }
}
