// Real processes through TokioLauncher. Unix only: the commands are run via `sh`.

#![cfg(unix)]

use crate::helpers::{RecordingFrontend, TEST_TIMEOUT};

use decker_core::error::spawn::SpawnError;
use decker_core::process::{ExitReport, Invocation, ProcessLauncher, TokioLauncher};

use std::path::PathBuf;
use std::sync::Arc;

use tokio::time::timeout;

fn shell(script: &str, working_dir: PathBuf) -> Invocation {
    Invocation {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        working_dir,
        label: "test".to_string(),
    }
}

/// **VALUE**: Verifies stdout and stderr are relayed line by line and the exit code reported.
///
/// **WHY THIS MATTERS**: decker's output is the user's only view into a build.
///
/// **BUG THIS CATCHES**: Would catch the exit report racing ahead of the last output lines.
#[tokio::test]
async fn given_process_writing_output_when_launched_then_lines_relayed_and_code_reported() {
    // GIVEN: A script writing to both streams and exiting with 3
    let dir = tempfile::tempdir().unwrap();
    let frontend = Arc::new(RecordingFrontend::default());
    let invocation = shell("echo one; echo two >&2; exit 3", dir.path().to_path_buf());

    // WHEN: Launching it and waiting for the exit
    let launched = TokioLauncher.launch(&invocation, frontend.clone()).unwrap();
    let report = timeout(TEST_TIMEOUT, launched.exit).await.unwrap().unwrap();

    // THEN: Code 3, both lines relayed with the label
    assert_eq!(report, ExitReport::Exited { code: Some(3) });
    let output = frontend.output();
    assert!(output.contains(&"test: one".to_string()));
    assert!(output.contains(&"test! two".to_string()));
    assert!(launched.pid > 0);
}

/// **VALUE**: Verifies output that is not valid UTF-8 is relayed and the process keeps running.
///
/// **WHY THIS MATTERS**: decker prints file names. In a non-UTF-8 locale those bytes must not
/// close the pipe, or decker's next write kills it with SIGPIPE.
///
/// **BUG THIS CATCHES**: Would catch the relay giving up on a decode error, which loses the
/// remaining output and turns a clean exit into a signal exit.
#[tokio::test]
async fn given_non_utf8_output_when_launched_then_all_lines_relayed_and_clean_exit() {
    // GIVEN: A script printing a Latin-1 byte, pausing, then printing a lot more
    let dir = tempfile::tempdir().unwrap();
    let frontend = Arc::new(RecordingFrontend::default());
    let invocation = shell(
        "printf 'before\\n'; printf 'caf\\351\\n'; sleep 0.2; \
         i=0; while [ $i -lt 2000 ]; do echo after; i=$((i+1)); done; exit 0",
        dir.path().to_path_buf(),
    );

    // WHEN: Launching it and waiting for the exit
    let launched = TokioLauncher.launch(&invocation, frontend.clone()).unwrap();
    let report = timeout(TEST_TIMEOUT, launched.exit).await.unwrap().unwrap();

    // THEN: A normal exit, with the odd line replaced and everything after it relayed
    assert_eq!(report, ExitReport::Exited { code: Some(0) });
    let output = frontend.output();
    assert_eq!(output[0], "test: before");
    assert_eq!(output[1], "test: caf\u{FFFD}");
    assert_eq!(output.iter().filter(|line| *line == "test: after").count(), 2000);
}

/// **VALUE**: Verifies the process runs in the invocation's working directory.
///
/// **WHY THIS MATTERS**: decker builds whatever is in its working directory.
///
/// **BUG THIS CATCHES**: Would catch `current_dir` being ignored.
#[tokio::test]
async fn given_working_dir_when_launched_then_process_runs_there() {
    let dir = tempfile::tempdir().unwrap();
    let frontend = Arc::new(RecordingFrontend::default());
    let invocation = shell("touch marker", dir.path().to_path_buf());

    let launched = TokioLauncher.launch(&invocation, frontend).unwrap();
    timeout(TEST_TIMEOUT, launched.exit).await.unwrap().unwrap();

    assert!(dir.path().join("marker").exists());
}

/// **VALUE**: Verifies the kill switch terminates a long-running process.
///
/// **WHY THIS MATTERS**: Stopping the server relies on it.
///
/// **BUG THIS CATCHES**: Would catch a kill that is ignored, leaving the server running.
#[tokio::test]
async fn given_long_running_process_when_killed_then_exits_without_code() {
    // GIVEN: A process that would run for a minute
    let dir = tempfile::tempdir().unwrap();
    let frontend = Arc::new(RecordingFrontend::default());
    let invocation = shell("exec sleep 60", dir.path().to_path_buf());
    let launched = TokioLauncher.launch(&invocation, frontend).unwrap();

    // WHEN: Firing the kill switch
    launched.kill.send(()).unwrap();

    // THEN: It exits promptly, terminated by a signal
    let report = timeout(TEST_TIMEOUT, launched.exit).await.unwrap().unwrap();
    assert_eq!(report, ExitReport::Exited { code: None });
}

/// **VALUE**: Verifies a missing program is a spawn error, not a panic.
///
/// **WHY THIS MATTERS**: The executable can vanish after the install check.
///
/// **BUG THIS CATCHES**: Would catch an unwrap on spawn.
#[tokio::test]
async fn given_missing_program_when_launched_then_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let invocation = Invocation {
        program: "decker-definitely-not-installed".to_string(),
        args: vec![],
        working_dir: dir.path().to_path_buf(),
        label: "test".to_string(),
    };

    let result = TokioLauncher.launch(&invocation, Arc::new(RecordingFrontend::default()));

    match result {
        Err(SpawnError::Spawn { message, .. }) => {
            assert!(message.contains("decker-definitely-not-installed"));
        }
        other => panic!("Expected a spawn error, got {other:?}"),
    }
}
