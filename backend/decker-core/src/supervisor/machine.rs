//! Server lifecycle as a pure state machine.
//!
//! [`transition`] maps the current state and one event to the next state
//! plus the side effects the supervisor must perform. It never touches a
//! process, so every lifecycle rule can be checked without spawning one.

use crate::ui::Notice;

pub const ALREADY_RUNNING_MESSAGE: &str = "Decker is already running in this session.";
pub const TERMINATED_MESSAGE: &str = "Decker Server terminated.";
pub const PROCESS_ERROR_MESSAGE: &str = "An error just happened to the decker server process.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerState {
    #[default]
    Idle,
    Running {
        pid: u32,
        port: u16,
    },
}

impl ServerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ServerState::Running { .. })
    }

    pub fn port(&self) -> Option<u16> {
        match self {
            ServerState::Running { port, .. } => Some(*port),
            ServerState::Idle => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    StartRequested,
    StopRequested,
    ToggleRequested,
    Spawned {
        pid: u32,
        port: u16,
        working_dir: String,
    },
    SpawnFailed {
        message: String,
    },
    Exited {
        pid: u32,
        code: Option<i32>,
    },
    Errored {
        pid: u32,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Check preconditions, negotiate a port and launch the server.
    BeginStart,
    Kill { pid: u32 },
    /// Forget the handle of a process that is already gone.
    Release { pid: u32 },
    Notify(Notice),
    Log(String),
    /// Publish the new state to the status display.
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ServerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: ServerState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// Exit log line for the server process.
pub fn exit_log_line(code: Option<i32>) -> String {
    match code {
        Some(code) if code != 0 => format!("[DECKER EXIT] Server closed with exitcode: {code}"),
        _ => "[DECKER EXIT] Server Closed".to_string(),
    }
}

pub fn transition(state: ServerState, event: ServerEvent) -> Transition {
    use ServerEvent::*;
    use ServerState::*;

    match (state, event) {
        (Idle, ToggleRequested) => transition(state, StartRequested),
        (Running { .. }, ToggleRequested) => transition(state, StopRequested),

        (Idle, StartRequested) => Transition::to(Idle, vec![Effect::BeginStart]),
        (Running { .. }, StartRequested) => Transition::to(
            state,
            vec![
                Effect::Notify(Notice::info(ALREADY_RUNNING_MESSAGE)),
                Effect::Refresh,
            ],
        ),

        (Running { pid, .. }, StopRequested) => Transition::to(
            Idle,
            vec![
                Effect::Kill { pid },
                Effect::Notify(Notice::info(TERMINATED_MESSAGE)),
                Effect::Refresh,
            ],
        ),
        (Idle, StopRequested) => Transition::to(Idle, vec![Effect::Refresh]),

        (
            Idle,
            Spawned {
                pid,
                port,
                working_dir,
            },
        ) => Transition::to(
            Running { pid, port },
            vec![
                Effect::Notify(Notice::info(format!(
                    "Started Decker Server in: {working_dir}:{port}"
                ))),
                Effect::Refresh,
            ],
        ),
        (Running { .. }, Spawned { pid, .. }) => Transition::to(
            state,
            vec![Effect::Log(format!(
                "[DECKER ERROR] Ignoring second server (PID {pid}) while one is running"
            ))],
        ),

        (_, SpawnFailed { message }) => Transition::to(
            state,
            vec![
                Effect::Log(format!("[DECKER ERROR] {message}")),
                Effect::Notify(Notice::info(PROCESS_ERROR_MESSAGE)),
                Effect::Refresh,
            ],
        ),

        (Running { pid: live, .. }, Exited { pid, code }) if live == pid => Transition::to(
            Idle,
            vec![
                Effect::Release { pid },
                Effect::Log(exit_log_line(code)),
                Effect::Notify(Notice::info(TERMINATED_MESSAGE)),
                Effect::Refresh,
            ],
        ),
        (_, Exited { code, .. }) => Transition::to(state, vec![Effect::Log(exit_log_line(code))]),

        (Running { pid: live, .. }, Errored { pid, message }) if live == pid => Transition::to(
            Idle,
            vec![
                Effect::Release { pid },
                Effect::Log(format!("[DECKER ERROR] {message}")),
                Effect::Notify(Notice::info(PROCESS_ERROR_MESSAGE)),
                Effect::Refresh,
            ],
        ),
        (_, Errored { message, .. }) => {
            Transition::to(state, vec![Effect::Log(format!("[DECKER ERROR] {message}"))])
        }
    }
}
