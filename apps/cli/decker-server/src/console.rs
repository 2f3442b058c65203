//! Terminal front end for the supervisor.
//!
//! Notices and status lines go to stderr, process output is relayed to the
//! matching stream (and to the log file), and pages are written as HTML files so a browser can
//! open them.

use crate::logger::DECKER_OUTPUT_TARGET;

use decker_core::ui::{Notice, Notifier, OutputSink, Severity, StatusLine};
use decker_core::view::Page;

use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, error, info, warn};

pub struct ConsoleFrontend {
    pages_dir: PathBuf,
    last_page: Mutex<Option<PathBuf>>,
}

impl ConsoleFrontend {
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            last_page: Mutex::new(None),
        }
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Where `page` is (or would be) written.
    pub fn page_path(&self, page: &Page) -> PathBuf {
        self.pages_dir.join(page.file_name())
    }

    /// File of the most recently written page.
    pub fn last_page(&self) -> Option<PathBuf> {
        match self.last_page.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_page(&self, page: &Page) -> std::io::Result<PathBuf> {
        create_dir_all(&self.pages_dir)?;
        let path = self.page_path(page);
        write(&path, page.render())?;
        Ok(path)
    }
}

impl Notifier for ConsoleFrontend {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => {
                info!("{}", notice.message);
                eprintln!("{}", notice.message);
            }
            Severity::Error => {
                error!("{}", notice.message);
                eprintln!("Error: {}", notice.message);
            }
        }
    }

    fn show_page(&self, page: &Page) {
        match self.write_page(page) {
            Ok(path) => {
                eprintln!("{}: {}", page.title(), path.display());
                match self.last_page.lock() {
                    Ok(mut guard) => *guard = Some(path),
                    Err(poisoned) => *poisoned.into_inner() = Some(path),
                }
            }
            Err(e) => warn!("Failed to write {} page: {e}", page.title()),
        }
    }

    fn status_changed(&self, status: StatusLine) {
        debug!("Status: {status}");
        eprintln!("{status}");
    }
}

impl OutputSink for ConsoleFrontend {
    fn stdout(&self, source: &str, line: &str) {
        println!("[{source}] {line}");
        info!(target: DECKER_OUTPUT_TARGET, "[{source}] {line}");
    }

    fn stderr(&self, source: &str, line: &str) {
        eprintln!("[{source}] {line}");
        warn!(target: DECKER_OUTPUT_TARGET, "[{source}!] {line}");
    }

    fn log(&self, line: &str) {
        info!("{line}");
    }
}
