//! Seams between the supervisor and whatever presents its output.
//!
//! The supervisor never prints. Notices, pages and status changes go to a
//! [`Notifier`]; process output and exit logs go to an [`OutputSink`].

use crate::DECKER_SERVER_BASE_URL;
use crate::supervisor::machine::ServerState;
use crate::view::Page;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// One-line summary of the server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub port: Option<u16>,
}

impl From<ServerState> for StatusLine {
    fn from(state: ServerState) -> Self {
        match state {
            ServerState::Idle => StatusLine { port: None },
            ServerState::Running { port, .. } => StatusLine { port: Some(port) },
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "Decker Server on {DECKER_SERVER_BASE_URL}:{port}"),
            None => f.write_str("No Decker Server running in this session"),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn show_page(&self, page: &Page);

    fn status_changed(&self, status: StatusLine);
}

pub trait OutputSink: Send + Sync {
    /// A line the process wrote to stdout; `source` names the invocation.
    fn stdout(&self, source: &str, line: &str);

    fn stderr(&self, source: &str, line: &str);

    /// Supervisor log line such as `[DECKER EXIT] ...`.
    fn log(&self, line: &str);
}
