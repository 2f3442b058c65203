//! Free port negotiation for the decker server.
//!
//! Starting from the configured port, each candidate is probed in turn and
//! the first one reported free is returned. Probes run strictly one after
//! another; the search is bounded by `max_attempts` and by the top of the
//! port range.

pub mod probe;

pub use probe::{CommandProbe, SocketTableProbe, probe_for, probe_invocation};

use crate::error::port::PortError;

use common::ErrorLocation;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

/// Reports whether a TCP port is currently in use.
#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn is_occupied(&self, port: u16) -> Result<bool, PortError>;
}

#[derive(Clone)]
pub struct PortNegotiator {
    probe: Arc<dyn PortProbe>,
    max_attempts: u32,
}

impl PortNegotiator {
    pub fn new(probe: Arc<dyn PortProbe>, max_attempts: u32) -> Self {
        Self {
            probe,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Find the first free port at or above `start`.
    ///
    /// # Errors
    ///
    /// * [`PortError::Probe`] - a probe could not be run
    /// * [`PortError::Exhausted`] - `max_attempts` candidates were occupied,
    ///   or the search ran past port 65535
    pub async fn negotiate(&self, start: u16) -> Result<u16, PortError> {
        let location = ErrorLocation::here();
        let mut candidate = start;
        let mut attempts = 0u32;

        loop {
            if attempts >= self.max_attempts {
                return Err(PortError::Exhausted {
                    start,
                    attempts,
                    location,
                });
            }

            attempts += 1;

            if !self.probe.is_occupied(candidate).await? {
                info!("Port {candidate} is free (after {attempts} probe(s))");
                return Ok(candidate);
            }

            debug!("Port {candidate} is occupied");

            candidate = match candidate.checked_add(1) {
                Some(next) => next,
                None => {
                    return Err(PortError::Exhausted {
                        start,
                        attempts,
                        location,
                    });
                }
            };
        }
    }
}
