//! Interactive session: one supervisor, commands read line by line from stdin.

use crate::commands::browse::resolve_document;
use crate::error::AppError;

use decker_core::process::OneShot;
use decker_core::supervisor::SupervisorHandle;
use decker_core::ui::StatusLine;

use common::ErrorLocation;

use std::io::{BufRead, stdin};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use log::{debug, info, warn};
use tokio::signal::ctrl_c;
use tokio::sync::mpsc;

pub const HELP_TEXT: &str = "\
Commands:
  start | stop | toggle | status
  open [DOCUMENT]       open a document (or the server root) in the browser
  preview [DOCUMENT]    write and open the preview page
  build | clean | purge | html | decks | pages | handouts
  search-index | crunch | publish | pdf
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Toggle,
    Status,
    Open(Option<PathBuf>),
    Preview(Option<PathBuf>),
    Run(OneShot),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
#[track_caller]
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let argument = (!rest.is_empty()).then(|| PathBuf::from(rest));

    let command = match word {
        "start" => SessionCommand::Start,
        "stop" => SessionCommand::Stop,
        "toggle" => SessionCommand::Toggle,
        "status" => SessionCommand::Status,
        "open" => SessionCommand::Open(argument),
        "preview" => SessionCommand::Preview(argument),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => match OneShot::from_name(other) {
            Some(command) => SessionCommand::Run(command),
            None => {
                return Err(AppError::Usage {
                    message: format!("Unknown command '{other}', type 'help' for a list"),
                    location: ErrorLocation::here(),
                });
            }
        },
    };

    Ok(Some(command))
}

/// Run the interactive loop until `quit`, end of input or Ctrl-C.
///
/// Starts the server right away when `server.autostart` is set.
pub async fn run(handle: &SupervisorHandle) -> Result<ExitCode, AppError> {
    if handle.config().server.autostart {
        info!("Autostart enabled, starting the decker server");
        handle.start().await?;
    }

    eprintln!("{HELP_TEXT}");
    let mut input = spawn_input_reader();

    loop {
        let line = tokio::select! {
            line = input.recv() => line,
            _ = ctrl_c() => {
                info!("Interrupted, leaving session");
                break;
            }
        };

        let Some(line) = line else {
            debug!("End of input");
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                debug!("{e}");
                eprintln!("Unknown command, type 'help' for a list");
                continue;
            }
        };

        if command == SessionCommand::Quit {
            break;
        }

        execute(handle, command).await?;
    }

    handle.stop().await?;
    Ok(ExitCode::SUCCESS)
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    break;
                }
            }
        }
    });

    rx
}

async fn execute(handle: &SupervisorHandle, command: SessionCommand) -> Result<(), AppError> {
    match command {
        SessionCommand::Start => {
            handle.start().await?;
        }
        SessionCommand::Stop => {
            handle.stop().await?;
        }
        SessionCommand::Toggle => {
            handle.toggle().await?;
        }
        SessionCommand::Status => eprintln!("{}", StatusLine::from(handle.state())),
        SessionCommand::Open(document) => {
            let document = resolve_document(document.as_deref())?;
            handle.open_browser(document.as_deref()).await?;
        }
        SessionCommand::Preview(document) => {
            let document = resolve_document(document.as_deref())?;
            handle.open_preview(document.as_deref()).await?;
        }
        SessionCommand::Run(command) => {
            let outcome = handle.run(command).await;
            debug!("decker {command} finished: {outcome:?}");
        }
        SessionCommand::Help => eprintln!("{HELP_TEXT}"),
        SessionCommand::Quit => {}
    }
    Ok(())
}
