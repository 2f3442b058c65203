// Unit tests for the pure lifecycle transitions.
// Supervisor behaviour with real channels lives in integration_tests/supervisor.rs

use crate::supervisor::machine::{
    ALREADY_RUNNING_MESSAGE, Effect, PROCESS_ERROR_MESSAGE, ServerEvent, ServerState,
    TERMINATED_MESSAGE, exit_log_line, transition,
};
use crate::ui::Notice;

const RUNNING: ServerState = ServerState::Running {
    pid: 4242,
    port: 8888,
};

/// **VALUE**: Verifies that a start request from Idle asks the supervisor to begin a start.
///
/// **WHY THIS MATTERS**: The state must stay Idle until the process actually spawned;
/// otherwise a failed spawn would leave a phantom Running state behind.
///
/// **BUG THIS CATCHES**: Would catch a transition that jumps to Running before `Spawned`.
#[test]
fn given_idle_when_start_requested_then_begins_start_and_stays_idle() {
    // GIVEN / WHEN: A start request while idle
    let t = transition(ServerState::Idle, ServerEvent::StartRequested);

    // THEN: Only BeginStart, no state change yet
    assert_eq!(t.state, ServerState::Idle);
    assert_eq!(t.effects, vec![Effect::BeginStart]);
}

/// **VALUE**: Verifies that start while running is informational only.
///
/// **WHY THIS MATTERS**: At most one server may run per session.
///
/// **BUG THIS CATCHES**: Would catch a BeginStart being emitted while running, which would
/// spawn a second server on another port.
#[test]
fn given_running_when_start_requested_then_reports_already_running() {
    // GIVEN / WHEN: A start request while running
    let t = transition(RUNNING, ServerEvent::StartRequested);

    // THEN: Same state, informational notice, no start
    assert_eq!(t.state, RUNNING);
    assert!(t.effects.contains(&Effect::Notify(Notice::info(ALREADY_RUNNING_MESSAGE))));
    assert!(!t.effects.contains(&Effect::BeginStart));
}

/// **VALUE**: Verifies that stop while running kills exactly the running PID.
///
/// **WHY THIS MATTERS**: The kill effect is the only way the server gets terminated.
///
/// **BUG THIS CATCHES**: Would catch a stop that forgets to kill (orphaned server), leaves the
/// state Running, or never tells the user the server terminated.
#[test]
fn given_running_when_stop_requested_then_kills_and_goes_idle() {
    // GIVEN / WHEN: A stop request while running
    let t = transition(RUNNING, ServerEvent::StopRequested);

    // THEN: Idle with a kill for the running pid and a termination notice
    assert_eq!(t.state, ServerState::Idle);
    assert_eq!(
        t.effects,
        vec![
            Effect::Kill { pid: 4242 },
            Effect::Notify(Notice::info(TERMINATED_MESSAGE)),
            Effect::Refresh
        ]
    );
}

/// **VALUE**: Verifies that stop while idle is a no-op.
///
/// **WHY THIS MATTERS**: Stop is bound to shutdown paths that run regardless of state.
///
/// **BUG THIS CATCHES**: Would catch a kill or error emitted with nothing running.
#[test]
fn given_idle_when_stop_requested_then_no_kill() {
    // GIVEN / WHEN: A stop request while idle
    let t = transition(ServerState::Idle, ServerEvent::StopRequested);

    // THEN: Only a status refresh
    assert_eq!(t.state, ServerState::Idle);
    assert_eq!(t.effects, vec![Effect::Refresh]);
}

/// **VALUE**: Verifies that toggle delegates to start or stop depending on state.
///
/// **WHY THIS MATTERS**: The interactive session binds a single key to toggle.
///
/// **BUG THIS CATCHES**: Would catch toggle starting while running or stopping while idle.
#[test]
fn given_either_state_when_toggled_then_behaves_like_start_or_stop() {
    assert_eq!(
        transition(ServerState::Idle, ServerEvent::ToggleRequested),
        transition(ServerState::Idle, ServerEvent::StartRequested)
    );
    assert_eq!(
        transition(RUNNING, ServerEvent::ToggleRequested),
        transition(RUNNING, ServerEvent::StopRequested)
    );
}

/// **VALUE**: Verifies the Spawned event moves Idle to Running with the reported pid and port.
///
/// **WHY THIS MATTERS**: Browser and preview URLs are built from the stored port.
///
/// **BUG THIS CATCHES**: Would catch port or pid being dropped on the way into the state.
#[test]
fn given_idle_when_spawned_then_running_with_pid_and_port() {
    // GIVEN / WHEN: A spawn report
    let t = transition(
        ServerState::Idle,
        ServerEvent::Spawned {
            pid: 7,
            port: 8890,
            working_dir: "/decks".to_string(),
        },
    );

    // THEN: Running with the spawned identity and a start notice
    assert_eq!(t.state, ServerState::Running { pid: 7, port: 8890 });
    assert!(t.effects.contains(&Effect::Notify(Notice::info(
        "Started Decker Server in: /decks:8890"
    ))));
    assert!(t.effects.contains(&Effect::Refresh));
}

/// **VALUE**: Verifies that the running process exiting on its own returns to Idle.
///
/// **WHY THIS MATTERS**: A crashed server must not block future starts.
///
/// **BUG THIS CATCHES**: Would catch the handle not being released after an exit.
#[test]
fn given_running_when_own_process_exits_then_idle_and_released() {
    // GIVEN / WHEN: The live process exits with code 3
    let t = transition(
        RUNNING,
        ServerEvent::Exited {
            pid: 4242,
            code: Some(3),
        },
    );

    // THEN: Idle, handle released, exit logged with code
    assert_eq!(t.state, ServerState::Idle);
    assert!(t.effects.contains(&Effect::Release { pid: 4242 }));
    assert!(t.effects.contains(&Effect::Log(
        "[DECKER EXIT] Server closed with exitcode: 3".to_string()
    )));
    assert!(t.effects.contains(&Effect::Notify(Notice::info(TERMINATED_MESSAGE))));
}

/// **VALUE**: Verifies that exit events from an older process do not touch the current one.
///
/// **WHY THIS MATTERS**: After stop + start, the killed process reports its exit late.
///
/// **BUG THIS CATCHES**: Would catch a stale exit flipping a fresh server to Idle.
#[test]
fn given_running_when_stale_process_exits_then_state_unchanged() {
    // GIVEN / WHEN: An exit from a different pid
    let t = transition(
        RUNNING,
        ServerEvent::Exited {
            pid: 1,
            code: None,
        },
    );

    // THEN: Still running, only logged
    assert_eq!(t.state, RUNNING);
    assert_eq!(
        t.effects,
        vec![Effect::Log("[DECKER EXIT] Server Closed".to_string())]
    );
}

/// **VALUE**: Verifies that a process error for the live server clears the handle.
///
/// **WHY THIS MATTERS**: Runtime errors are recovered locally; the user can start again.
///
/// **BUG THIS CATCHES**: Would catch errors leaving the supervisor stuck in Running.
#[test]
fn given_running_when_process_errors_then_idle_with_notice() {
    // GIVEN / WHEN: The live process reports an error
    let t = transition(
        RUNNING,
        ServerEvent::Errored {
            pid: 4242,
            message: "wait failed".to_string(),
        },
    );

    // THEN: Idle, logged and surfaced informationally
    assert_eq!(t.state, ServerState::Idle);
    assert!(t.effects.contains(&Effect::Log("[DECKER ERROR] wait failed".to_string())));
    assert!(t.effects.contains(&Effect::Notify(Notice::info(PROCESS_ERROR_MESSAGE))));
}

/// **VALUE**: Verifies that a failed spawn is logged and reported without a state change.
///
/// **WHY THIS MATTERS**: The executable can vanish between the install check and spawn.
///
/// **BUG THIS CATCHES**: Would catch spawn failures being swallowed or moving to Running.
#[test]
fn given_idle_when_spawn_failed_then_stays_idle_and_logs() {
    // GIVEN / WHEN: A spawn failure
    let t = transition(
        ServerState::Idle,
        ServerEvent::SpawnFailed {
            message: "No such file".to_string(),
        },
    );

    // THEN: Idle, error logged
    assert_eq!(t.state, ServerState::Idle);
    assert_eq!(
        t.effects[0],
        Effect::Log("[DECKER ERROR] No such file".to_string())
    );
}

/// **VALUE**: Verifies the exit log wording for zero, non-zero and signal exits.
///
/// **WHY THIS MATTERS**: Users read the log to tell crashes from clean shutdowns.
///
/// **BUG THIS CATCHES**: Would catch exit code 0 being reported as a failure code.
#[test]
fn given_exit_codes_when_formatting_log_line_then_only_non_zero_shows_code() {
    assert_eq!(exit_log_line(Some(0)), "[DECKER EXIT] Server Closed");
    assert_eq!(exit_log_line(None), "[DECKER EXIT] Server Closed");
    assert_eq!(
        exit_log_line(Some(1)),
        "[DECKER EXIT] Server closed with exitcode: 1"
    );
}
