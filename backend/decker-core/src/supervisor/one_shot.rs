use crate::process::{ExitReport, Invocation, Launched, OneShot};
use crate::supervisor::Dependencies;
use crate::ui::Notice;
use crate::view::Page;

use log::{error, info, warn};

pub const NO_WORKSPACE_COMMAND_MESSAGE: &str = "No workspace is open to run a decker command in.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShotOutcome {
    NotInstalled,
    NoWorkspace,
    /// The command is not available on this platform.
    Unsupported,
    SpawnFailed {
        message: String,
    },
    /// The process ran; a non-zero `code` is still a finished run.
    Finished {
        code: Option<i32>,
    },
    Failed {
        message: String,
    },
}

impl OneShotOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OneShotOutcome::Finished { code: Some(0) })
    }
}

pub fn exit_log_line(command: OneShot, code: Option<i32>) -> String {
    match code {
        Some(code) if code != 0 => format!("[DECKER EXIT] decker {command} exitcode: {code}"),
        _ => format!("[DECKER EXIT] decker {command}"),
    }
}

/// Run `command` in the working directory and wait for it to exit.
pub(crate) async fn run(deps: &Dependencies, command: OneShot) -> OneShotOutcome {
    if !deps.is_installed() {
        warn!("'{}' is not installed, showing install help", deps.command());
        deps.notifier.show_page(&Page::install_help(deps.command()));
        return OneShotOutcome::NotInstalled;
    }

    let Some(workspace) = deps.workspace_dir() else {
        deps.notifier.notify(Notice::error(NO_WORKSPACE_COMMAND_MESSAGE));
        return OneShotOutcome::NoWorkspace;
    };

    if !command.is_supported_on(deps.platform) {
        deps.notifier.notify(Notice::error(format!(
            "decker {command} is not supported on this platform."
        )));
        return OneShotOutcome::Unsupported;
    }

    let working_dir = deps.config.working_directory(workspace);
    let invocation = Invocation::one_shot(deps.command(), command, &working_dir);
    info!(
        "Running '{}' in {}",
        invocation.command_line(),
        working_dir.display()
    );

    let Launched { kill, exit, .. } = match deps.launcher.launch(&invocation, deps.sink.clone()) {
        Ok(launched) => launched,
        Err(e) => {
            error!("Failed to run decker {command}: {e}");
            let message = e.to_string();
            report_failure(deps, command, &message);
            return OneShotOutcome::SpawnFailed { message };
        }
    };

    // Dropping the kill switch would terminate the run.
    let _kill = kill;

    let message = match exit.await {
        Ok(ExitReport::Exited { code }) => {
            deps.sink.log(&exit_log_line(command, code));
            deps.notifier
                .notify(Notice::info(command.completion_message()));
            return OneShotOutcome::Finished { code };
        }
        Ok(ExitReport::Failed { message }) => message,
        Err(_) => format!("decker {command} ended without an exit status"),
    };

    error!("decker {command} failed: {message}");
    report_failure(deps, command, &message);
    OneShotOutcome::Failed { message }
}

fn report_failure(deps: &Dependencies, command: OneShot, message: &str) {
    deps.sink.log(&format!("[DECKER ERROR] {message}"));
    deps.notifier.notify(Notice::info(format!(
        "An error happened while running decker {command}."
    )));
}
