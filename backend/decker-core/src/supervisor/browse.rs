use crate::error::supervisor::SupervisorError;
use crate::preview::{document_html_path, open_in_browser, server_url};
use crate::readiness::wait_until_serving;
use crate::supervisor::SupervisorHandle;
use crate::ui::Notice;
use crate::view::Page;

use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

pub const NO_DOCUMENT_MESSAGE: &str = "No active document.";
pub const NOT_MARKDOWN_MESSAGE: &str = "Preview was not opened in a markdown file.";
pub const START_FAILED_MESSAGE: &str =
    "Unable to start a decker server in the workbench directory.";

impl SupervisorHandle {
    /// Port of the running server, starting one when idle.
    ///
    /// A freshly started server is given `ready_timeout_secs` to answer
    /// HTTP before the port is returned. `None` means no server could be
    /// started; the reason has already been reported.
    pub async fn ensure_running(&self) -> Result<Option<u16>, SupervisorError> {
        if let Some(port) = self.state().port() {
            return Ok(Some(port));
        }

        let Some(port) = self.start().await?.port() else {
            return Ok(None);
        };

        let ready_timeout = Duration::from_secs(self.config().server.ready_timeout_secs);
        if let Err(e) = wait_until_serving(&server_url(port, None), ready_timeout).await {
            warn!("Continuing without a ready server: {e}");
        }

        Ok(Some(port))
    }

    /// Server-relative HTML path of `document` in this workspace.
    pub fn html_path_for(&self, document: &Path) -> Option<String> {
        let workspace = self.workspace()?;
        document_html_path(workspace, document, self.config().deck_folder.as_deref())
    }

    /// Show the preview page for `document`, starting the server if needed.
    pub async fn open_preview(&self, document: Option<&Path>) -> Result<Page, SupervisorError> {
        let page = match self.ensure_running().await? {
            None => Page::error(START_FAILED_MESSAGE),
            Some(port) => match document {
                None => Page::error(NO_DOCUMENT_MESSAGE),
                Some(document) => match self.html_path_for(document) {
                    Some(path) => Page::preview(port, &path),
                    None => Page::error(NOT_MARKDOWN_MESSAGE),
                },
            },
        };

        self.dependencies().notifier.show_page(&page);
        Ok(page)
    }

    /// URL the browser should open for `document`.
    ///
    /// Documents without a published page fall back to the server root.
    pub async fn browser_url(&self, document: Option<&Path>) -> Result<Option<String>, SupervisorError> {
        let Some(document) = document else {
            self.dependencies()
                .notifier
                .notify(Notice::error(NO_DOCUMENT_MESSAGE));
            return Ok(None);
        };

        let Some(port) = self.ensure_running().await? else {
            return Ok(None);
        };

        let path = self.html_path_for(document);
        debug!("Browser path for {}: {path:?}", document.display());
        Ok(Some(server_url(port, path.as_deref())))
    }

    /// Open `document` on the running server in the system browser.
    pub async fn open_browser(&self, document: Option<&Path>) -> Result<Option<String>, SupervisorError> {
        let url = self.browser_url(document).await?;

        if let Some(url) = &url
            && let Err(e) = open_in_browser(url)
        {
            warn!("{e}");
            self.dependencies()
                .notifier
                .notify(Notice::error(format!("Could not open a browser for {url}.")));
        }

        Ok(url)
    }
}
