use crate::error::AppError;

use decker_core::preview::server_url;
use decker_core::supervisor::SupervisorHandle;

use common::ErrorLocation;

use std::process::ExitCode;

use log::{info, warn};
use tokio::signal::ctrl_c;

/// Start the server and stay in the foreground until it exits or Ctrl-C.
///
/// # Errors
///
/// Returns [`AppError::NotRunning`] when no server could be started; the
/// reason has already been reported to the user.
pub async fn serve(handle: &SupervisorHandle) -> Result<ExitCode, AppError> {
    let Some(port) = handle.start().await?.port() else {
        return Err(AppError::NotRunning {
            message: "The decker server could not be started".to_string(),
            location: ErrorLocation::here(),
        });
    };

    info!("Serving on {}", server_url(port, None));
    hold(handle).await?;
    Ok(ExitCode::SUCCESS)
}

/// Block until the server stops by itself or the user presses Ctrl-C.
pub async fn hold(handle: &SupervisorHandle) -> Result<(), AppError> {
    tokio::select! {
        _ = handle.wait_until_idle() => {
            info!("Decker server is no longer running");
        }
        signal = ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl-C: {e}");
            }
            info!("Interrupted, stopping the decker server");
            handle.stop().await?;
        }
    }
    Ok(())
}
