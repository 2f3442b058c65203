//! Mapping editor documents to URLs on the decker server.
//!
//! The server publishes `foo/bar.md` as `foo/bar.html`, relative to the
//! directory it runs in (the deck folder when configured).

use crate::DECKER_SERVER_BASE_URL;
use crate::error::spawn::SpawnError;

use common::ErrorLocation;

use std::path::{Component, Path, PathBuf};

use log::{debug, info};
use url::Url;

const SOURCE_EXTENSION: &str = "md";
const OUTPUT_EXTENSION: &str = "html";

/// Server-relative output path of `document`, using `/` separators.
///
/// `document` may be absolute or relative to `workspace`. Returns `None`
/// when the document is not a markdown file or lies outside the served
/// directory.
pub fn document_html_path(
    workspace: &Path,
    document: &Path,
    deck_folder: Option<&str>,
) -> Option<String> {
    let absolute = normalize(&workspace.join(document));
    let served_root = normalize(&match deck_folder {
        Some(folder) => workspace.join(folder),
        None => workspace.to_path_buf(),
    });

    let relative = absolute.strip_prefix(&served_root).ok()?;

    if relative.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        debug!("{} is not a markdown document", document.display());
        return None;
    }

    let output = relative.with_extension(OUTPUT_EXTENSION);
    let segments: Vec<String> = output
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        return None;
    }

    Some(segments.join("/"))
}

/// `http://localhost:<port>/<path>` with each path segment percent-encoded.
pub fn server_url(port: u16, html_path: Option<&str>) -> String {
    let base = format!("{DECKER_SERVER_BASE_URL}:{port}/");

    let Some(path) = html_path else {
        return base;
    };

    match Url::parse(&base) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .extend(path.split('/').filter(|s| !s.is_empty()));
            }
            url.to_string()
        }
        Err(_) => format!("{base}{path}"),
    }
}

/// Open `url` in the system browser.
#[track_caller]
pub fn open_in_browser(url: &str) -> Result<(), SpawnError> {
    info!("Opening {url} in browser");
    open::that(url).map_err(|e| SpawnError::Spawn {
        message: format!("Failed to open browser for {url}: {e}"),
        location: ErrorLocation::here(),
        source: Box::new(e),
    })
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
