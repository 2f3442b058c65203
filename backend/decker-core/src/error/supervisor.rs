use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SupervisorError {
    /// The supervisor task is gone; no further requests can be served.
    #[error("Supervisor Stopped Error: {message} {location}")]
    Stopped {
        message: String,
        location: ErrorLocation,
    },
}
