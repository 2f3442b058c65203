use crate::Platform;

use std::fmt;
use std::path::{Path, PathBuf};

const SERVER_FLAG: &str = "--server";
const PORT_FLAG: &str = "-p";
const EXTERNAL_FLAG: &str = "-e";
const PDF_JOBS_FLAG: &str = "-j1";
const SERVER_LABEL: &str = "server";

/// Server mode arguments: `--server -p <port> -e`.
pub fn server_args(port: u16) -> Vec<String> {
    vec![
        SERVER_FLAG.to_string(),
        PORT_FLAG.to_string(),
        port.to_string(),
        EXTERNAL_FLAG.to_string(),
    ]
}

/// Single-run decker commands that build, clean or export and then exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneShot {
    Build,
    Clean,
    Purge,
    Html,
    Decks,
    Pages,
    Handouts,
    SearchIndex,
    Crunch,
    Publish,
    Pdf,
}

impl OneShot {
    pub const ALL: [OneShot; 11] = [
        OneShot::Build,
        OneShot::Clean,
        OneShot::Purge,
        OneShot::Html,
        OneShot::Decks,
        OneShot::Pages,
        OneShot::Handouts,
        OneShot::SearchIndex,
        OneShot::Crunch,
        OneShot::Publish,
        OneShot::Pdf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OneShot::Build => "build",
            OneShot::Clean => "clean",
            OneShot::Purge => "purge",
            OneShot::Html => "html",
            OneShot::Decks => "decks",
            OneShot::Pages => "pages",
            OneShot::Handouts => "handouts",
            OneShot::SearchIndex => "search-index",
            OneShot::Crunch => "crunch",
            OneShot::Publish => "publish",
            OneShot::Pdf => "pdf",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// Arguments passed to decker. A plain build has no subcommand.
    pub fn args(&self) -> Vec<String> {
        match self {
            OneShot::Build => vec![EXTERNAL_FLAG.to_string()],
            OneShot::Crunch => vec![self.name().to_string()],
            OneShot::Pdf => vec![self.name().to_string(), PDF_JOBS_FLAG.to_string()],
            _ => vec![self.name().to_string(), EXTERNAL_FLAG.to_string()],
        }
    }

    pub fn completion_message(&self) -> &'static str {
        match self {
            OneShot::Build => "Finished building project.",
            OneShot::Clean => "Finished cleaning project.",
            OneShot::Purge => "Finished purging project.",
            OneShot::Html => "Finished building HTML files.",
            OneShot::Decks => "Finished building decks.",
            OneShot::Pages => "Finished building pages.",
            OneShot::Handouts => "Finished building handouts.",
            OneShot::SearchIndex => "Finished building the search index.",
            OneShot::Crunch => "Finished reformatting video files.",
            OneShot::Publish => "Finished publishing project.",
            OneShot::Pdf => "Finished exporting PDF files.",
        }
    }

    pub fn is_supported_on(&self, platform: Platform) -> bool {
        !matches!((self, platform), (OneShot::Pdf, Platform::Windows))
    }
}

impl fmt::Display for OneShot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully specified decker run: what to execute and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Short name used to tag relayed output and exit logs.
    pub label: String,
}

impl Invocation {
    pub fn server(program: impl Into<String>, port: u16, working_dir: &Path) -> Self {
        Self {
            program: program.into(),
            args: server_args(port),
            working_dir: working_dir.to_path_buf(),
            label: SERVER_LABEL.to_string(),
        }
    }

    pub fn one_shot(program: impl Into<String>, command: OneShot, working_dir: &Path) -> Self {
        Self {
            program: program.into(),
            args: command.args(),
            working_dir: working_dir.to_path_buf(),
            label: command.name().to_string(),
        }
    }

    /// Space-joined command line for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
