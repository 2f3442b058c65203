use common::ErrorLocation;

use std::error::Error as StdError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortError {
    /// The diagnostic used to check a port could not run at all.
    #[error("Port Probe Error: {message} {location}")]
    Probe {
        port: u16,
        message: String,
        location: ErrorLocation,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Port Exhausted Error: no free port in {attempts} attempts starting at {start} {location}")]
    Exhausted {
        start: u16,
        attempts: u32,
        location: ErrorLocation,
    },
}
