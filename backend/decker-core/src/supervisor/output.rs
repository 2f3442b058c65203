use crate::ui::{Notice, Notifier, OutputSink};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const STDERR_NOTICE_MESSAGE: &str = "Decker just reported an error.";

/// Sink for the long-lived server: relays everything and raises one error
/// notice the first time the server writes to stderr.
pub(crate) struct ServerOutput {
    inner: Arc<dyn OutputSink>,
    notifier: Arc<dyn Notifier>,
    reported: AtomicBool,
}

impl ServerOutput {
    pub(crate) fn new(inner: Arc<dyn OutputSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner,
            notifier,
            reported: AtomicBool::new(false),
        }
    }
}

impl OutputSink for ServerOutput {
    fn stdout(&self, source: &str, line: &str) {
        self.inner.stdout(source, line);
    }

    fn stderr(&self, source: &str, line: &str) {
        self.inner.stderr(source, line);
        if !self.reported.swap(true, Ordering::SeqCst) {
            self.notifier.notify(Notice::error(STDERR_NOTICE_MESSAGE));
        }
    }

    fn log(&self, line: &str) {
        self.inner.log(line);
    }
}
