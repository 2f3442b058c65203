pub mod config;
pub mod port;
pub mod spawn;
pub mod supervisor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Port(#[from] port::PortError),

    #[error(transparent)]
    Spawn(#[from] spawn::SpawnError),

    #[error(transparent)]
    Supervisor(#[from] supervisor::SupervisorError),
}
