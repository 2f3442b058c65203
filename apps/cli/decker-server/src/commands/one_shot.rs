use decker_core::process::OneShot;
use decker_core::supervisor::{OneShotOutcome, SupervisorHandle};

use std::process::ExitCode;

use log::{debug, warn};

/// Run a single decker command; the exit code reflects decker's.
pub async fn run(handle: &SupervisorHandle, command: OneShot) -> ExitCode {
    let outcome = handle.run(command).await;
    debug!("decker {command} finished: {outcome:?}");
    exit_code(&outcome)
}

pub fn exit_code(outcome: &OneShotOutcome) -> ExitCode {
    match outcome {
        OneShotOutcome::Finished { code: Some(code) } => {
            u8::try_from(*code).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        // Terminated by a signal
        OneShotOutcome::Finished { code: None } => ExitCode::FAILURE,
        other => {
            warn!("decker command did not finish: {other:?}");
            ExitCode::FAILURE
        }
    }
}
