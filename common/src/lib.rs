//! Shared primitives for the decker-server workspace.
//!
//! - **common** (this crate): error location tracking used by every error type
//! - **decker-core**: supervisor logic for the external `decker` tool
//! - **decker-server**: command-line front end wiring everything together

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
