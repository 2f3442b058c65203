//! Executable resolution.
//!
//! Answers one question: can the configured command be found on the search
//! path? A missing executable is a normal outcome (`false`), never an error;
//! callers respond by showing installation guidance.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{debug, trace};

const PATH_VARIABLE: &str = "PATH";

pub trait ExecutableResolver: Send + Sync {
    /// Whether `command` resolves to something executable.
    fn is_installed(&self, command: &str) -> bool;
}

/// Resolver backed by the `which` crate.
///
/// Uses the process `PATH` unless an explicit search path is provided.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve against `search_path` instead of the process environment.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Full path the command resolves to, if any.
    pub fn locate(&self, command: &str) -> Option<PathBuf> {
        let result = match &self.search_path {
            Some(paths) => {
                let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(command, Some(paths), cwd)
            }
            None => which::which(command),
        };

        match result {
            Ok(path) => {
                trace!("Resolved '{command}' to {}", path.display());
                Some(path)
            }
            Err(e) => {
                debug!("Could not resolve '{command}': {e}");
                None
            }
        }
    }
}

impl ExecutableResolver for PathResolver {
    fn is_installed(&self, command: &str) -> bool {
        self.locate(command).is_some()
    }
}

/// Entries of the current `PATH`, one per element, for installation help.
pub fn search_path_entries() -> Vec<String> {
    env::var_os(PATH_VARIABLE)
        .map(|raw| split_search_path(&raw))
        .unwrap_or_default()
}

/// Split a PATH-like value using the platform separator, dropping empty entries.
pub fn split_search_path(raw: &std::ffi::OsStr) -> Vec<String> {
    env::split_paths(raw)
        .filter(|entry| entry != Path::new(""))
        .map(|entry| entry.to_string_lossy().into_owned())
        .collect()
}
