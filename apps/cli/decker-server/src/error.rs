use decker_core::error::CoreError;
use decker_core::error::config::ConfigError;
use decker_core::error::supervisor::SupervisorError;

use common::ErrorLocation;

use thiserror::Error;

/// Errors surfaced by the command line front end.
///
/// Core errors are flattened to their message; the location recorded here
/// is where the front end received them.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this app
    #[error("Decker Server Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Error from decker-core operations (config, ports, processes)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// A command needed a running server and none could be started
    #[error("Not Running Error: {message} {location}")]
    NotRunning {
        message: String,
        location: ErrorLocation,
    },

    /// Input the session or CLI could not understand
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },
}

impl From<CoreError> for AppError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        AppError::Core {
            message: e.to_string(),
            location: ErrorLocation::here(),
        }
    }
}

impl From<ConfigError> for AppError {
    #[track_caller]
    fn from(e: ConfigError) -> Self {
        AppError::from(CoreError::from(e))
    }
}

impl From<SupervisorError> for AppError {
    #[track_caller]
    fn from(e: SupervisorError) -> Self {
        AppError::from(CoreError::from(e))
    }
}
