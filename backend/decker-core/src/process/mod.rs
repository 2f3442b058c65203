//! Building and launching decker invocations.

pub mod invocation;
pub mod launcher;

pub use invocation::{Invocation, OneShot, server_args};
pub use launcher::{ExitReport, Launched, ProcessLauncher, TokioLauncher};
