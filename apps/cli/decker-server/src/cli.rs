//! Command line arguments.

use decker_core::config::DeckerConfig;
use decker_core::error::config::ConfigError;
use decker_core::process::OneShot;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "decker-server", version, about = "Run, preview and build decker projects")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Log everything, including process output relays.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

/// Flags that take precedence over `config.json`.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Executable to run instead of `decker`.
    #[arg(long = "command", value_name = "PATH", global = true)]
    pub executable: Option<String>,

    /// First port to try for the server.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Sub-folder of the workspace holding the decks.
    #[arg(long, global = true)]
    pub deck_folder: Option<String>,

    /// Project directory; defaults to the current directory.
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Directory holding `config.json`.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
}

impl Overrides {
    /// Apply the flags on top of `config` and validate the result.
    #[track_caller]
    pub fn apply(&self, config: &mut DeckerConfig) -> Result<(), ConfigError> {
        if let Some(executable) = &self.executable {
            config.executable.command = executable.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(folder) = &self.deck_folder {
            config.deck_folder = Some(folder.clone());
        }
        config.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Start the server and keep it running until it exits or Ctrl-C.
    Serve,
    /// Open a document (or the server root) in the browser.
    Open { document: Option<PathBuf> },
    /// Write the preview page for a document and open it.
    Preview { document: Option<PathBuf> },
    /// Interactive session with start/stop and one-shot commands.
    Session,
    /// Build the project.
    Build,
    /// Remove generated files.
    Clean,
    /// Remove generated files and caches.
    Purge,
    Html,
    Decks,
    Pages,
    Handouts,
    SearchIndex,
    /// Reformat video files.
    Crunch,
    Publish,
    /// Export decks to PDF (not available on Windows).
    Pdf,
    /// Print the effective configuration.
    Config {
        /// Write the effective configuration to `config.json`.
        #[arg(long)]
        save: bool,
    },
}

impl Action {
    /// The decker one-shot this action runs, if it is one.
    pub fn one_shot(&self) -> Option<OneShot> {
        match self {
            Action::Build => Some(OneShot::Build),
            Action::Clean => Some(OneShot::Clean),
            Action::Purge => Some(OneShot::Purge),
            Action::Html => Some(OneShot::Html),
            Action::Decks => Some(OneShot::Decks),
            Action::Pages => Some(OneShot::Pages),
            Action::Handouts => Some(OneShot::Handouts),
            Action::SearchIndex => Some(OneShot::SearchIndex),
            Action::Crunch => Some(OneShot::Crunch),
            Action::Publish => Some(OneShot::Publish),
            Action::Pdf => Some(OneShot::Pdf),
            Action::Serve
            | Action::Open { .. }
            | Action::Preview { .. }
            | Action::Session
            | Action::Config { .. } => None,
        }
    }
}
