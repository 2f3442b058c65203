use crate::commands::server::hold;
use crate::console::ConsoleFrontend;
use crate::error::AppError;

use decker_core::preview::open_in_browser;
use decker_core::supervisor::SupervisorHandle;
use decker_core::view::Page;

use common::ErrorLocation;

use std::path::{Path, PathBuf, absolute};
use std::process::ExitCode;

use log::{info, warn};

/// Document paths from the command line are relative to the current directory.
#[track_caller]
pub fn resolve_document(document: Option<&Path>) -> Result<Option<PathBuf>, AppError> {
    document
        .map(|path| {
            absolute(path).map_err(|e| AppError::Usage {
                message: format!("Invalid document path {}: {e}", path.display()),
                location: ErrorLocation::here(),
            })
        })
        .transpose()
}

/// Open `document` on the server in the system browser, then keep serving.
pub async fn open(handle: &SupervisorHandle, document: Option<&Path>) -> Result<ExitCode, AppError> {
    let document = resolve_document(document)?;

    let Some(url) = handle.open_browser(document.as_deref()).await? else {
        return Ok(ExitCode::FAILURE);
    };

    info!("Opened {url}");
    hold(handle).await?;
    Ok(ExitCode::SUCCESS)
}

/// Write the preview page for `document`, open it, then keep serving.
///
/// Error pages are opened as well but the command exits right away.
pub async fn preview(
    handle: &SupervisorHandle,
    frontend: &ConsoleFrontend,
    document: Option<&Path>,
) -> Result<ExitCode, AppError> {
    let document = resolve_document(document)?;
    let page = handle.open_preview(document.as_deref()).await?;

    let page_file = frontend.page_path(&page);
    if let Err(e) = open_in_browser(&page_file.to_string_lossy()) {
        warn!("{e}");
    }

    match page {
        Page::Preview { .. } => {
            hold(handle).await?;
            Ok(ExitCode::SUCCESS)
        }
        Page::Error { .. } | Page::InstallHelp { .. } => Ok(ExitCode::FAILURE),
    }
}
