use crate::helpers::{
    FakeLauncher, FakeResolver, Harness, RecordingFrontend, ScriptedProbe, TEST_TIMEOUT,
    test_config,
};

use decker_core::Platform;
use decker_core::process::OneShot;
use decker_core::supervisor::browse::{NO_DOCUMENT_MESSAGE, NOT_MARKDOWN_MESSAGE};
use decker_core::supervisor::machine::{ALREADY_RUNNING_MESSAGE, TERMINATED_MESSAGE};
use decker_core::supervisor::{
    Dependencies, NO_WORKSPACE_SERVER_MESSAGE, OneShotOutcome, STDERR_NOTICE_MESSAGE,
    ServerState, Supervisor,
};
use decker_core::ui::{Notice, Severity, StatusLine};
use decker_core::view::Page;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::time::timeout;

// ============================================================================
// Server lifecycle through the actor, with fake process and probe
// ============================================================================

/// **VALUE**: Verifies a start negotiates past occupied ports and launches server mode there.
///
/// **WHY THIS MATTERS**: This is the main path: find a port, start `decker --server`, report it.
///
/// **BUG THIS CATCHES**: Would catch the configured port being used despite being occupied,
/// or the server being started outside the workspace.
#[tokio::test]
async fn given_occupied_ports_when_starting_then_runs_on_first_free_port() {
    // GIVEN: 8888 and 8889 are taken
    let h = Harness::new(true, ScriptedProbe::occupied([8888, 8889]));

    // WHEN: Starting the server
    let state = h.handle.start().await.unwrap();

    // THEN: Running on 8890 in the workspace
    assert_eq!(state.port(), Some(8890));
    assert_eq!(h.probe.probed(), vec![8888, 8889, 8890]);

    let invocations = h.launcher.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].args, vec!["--server", "-p", "8890", "-e"]);
    assert_eq!(invocations[0].working_dir, h.workspace.path());

    let started = format!(
        "Started Decker Server in: {}:8890",
        h.workspace.path().display()
    );
    assert!(h.frontend.notices().contains(&Notice::info(started)));
    assert_eq!(h.frontend.last_status(), Some(StatusLine { port: Some(8890) }));
}

/// **VALUE**: Verifies a second start does not spawn a second server.
///
/// **WHY THIS MATTERS**: Two servers would fight over the same deck folder.
///
/// **BUG THIS CATCHES**: Would catch the running check being skipped on repeated requests.
#[tokio::test]
async fn given_running_server_when_started_again_then_no_second_spawn() {
    // GIVEN: A running server
    let h = Harness::new(true, ScriptedProbe::free());
    let first = h.handle.start().await.unwrap();

    // WHEN: Starting again
    let second = h.handle.start().await.unwrap();

    // THEN: Same state, one invocation, informational notice
    assert_eq!(first, second);
    assert_eq!(h.launcher.invocations().len(), 1);
    assert!(
        h.frontend
            .notices()
            .contains(&Notice::info(ALREADY_RUNNING_MESSAGE))
    );
}

/// **VALUE**: Verifies stop while idle kills nothing and reports nothing.
///
/// **WHY THIS MATTERS**: Stop runs on every shutdown path.
///
/// **BUG THIS CATCHES**: Would catch a spurious error notice for an idle stop.
#[tokio::test]
async fn given_idle_when_stopped_then_no_kill_and_no_error() {
    let h = Harness::new(true, ScriptedProbe::free());

    let state = h.handle.stop().await.unwrap();

    assert_eq!(state, ServerState::Idle);
    assert!(h.launcher.killed().is_empty());
    assert!(
        h.frontend
            .notices()
            .iter()
            .all(|n| n.severity != Severity::Error)
    );
}

/// **VALUE**: Verifies stop kills the running server.
///
/// **WHY THIS MATTERS**: A server that survives stop keeps the port and the deck folder busy.
///
/// **BUG THIS CATCHES**: Would catch the kill switch not being fired.
#[tokio::test]
async fn given_running_when_stopped_then_process_killed_and_idle() {
    // GIVEN: A running server
    let h = Harness::new(true, ScriptedProbe::free());
    let ServerState::Running { pid, .. } = h.handle.start().await.unwrap() else {
        panic!("Server should be running");
    };

    // WHEN: Stopping
    let state = h.handle.stop().await.unwrap();

    // THEN: Idle, the user is told, and the fake process saw the kill
    assert_eq!(state, ServerState::Idle);
    assert!(h.frontend.notices().contains(&Notice::info(TERMINATED_MESSAGE)));
    timeout(TEST_TIMEOUT, async {
        while !h.launcher.killed().contains(&pid) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("Server was not killed");
    assert_eq!(h.frontend.last_status(), Some(StatusLine { port: None }));
}

/// **VALUE**: Verifies toggle alternates between start and stop.
///
/// **WHY THIS MATTERS**: The session binds one key to toggle.
///
/// **BUG THIS CATCHES**: Would catch toggle always starting.
#[tokio::test]
async fn given_idle_when_toggled_twice_then_running_then_idle() {
    let h = Harness::new(true, ScriptedProbe::free());

    assert!(h.handle.toggle().await.unwrap().is_running());
    assert!(!h.handle.toggle().await.unwrap().is_running());
    assert_eq!(h.launcher.invocations().len(), 1);
}

/// **VALUE**: Verifies a server that exits on its own returns the supervisor to Idle.
///
/// **WHY THIS MATTERS**: After a crash the user must be able to start again.
///
/// **BUG THIS CATCHES**: Would catch the live handle not being cleared, which would block
/// every later start with "already running".
#[tokio::test]
async fn given_running_when_process_exits_then_idle_and_restartable() {
    // GIVEN: A running server
    let h = Harness::new(true, ScriptedProbe::free());
    let ServerState::Running { pid, .. } = h.handle.start().await.unwrap() else {
        panic!("Server should be running");
    };

    // WHEN: The process exits with code 1
    h.launcher.crash(pid, Some(1));
    timeout(TEST_TIMEOUT, h.handle.wait_until_idle())
        .await
        .expect("Supervisor did not notice the exit");

    // THEN: Exit logged, user told
    assert!(
        h.frontend
            .output()
            .contains(&"[DECKER EXIT] Server closed with exitcode: 1".to_string())
    );
    assert!(h.frontend.notices().contains(&Notice::info(TERMINATED_MESSAGE)));

    // AND: A new start spawns a fresh process
    let ServerState::Running { pid: new_pid, .. } = h.handle.start().await.unwrap() else {
        panic!("Server should be running again");
    };
    assert_ne!(pid, new_pid);
    assert_eq!(h.launcher.invocations().len(), 2);
}

/// **VALUE**: Verifies a missing executable short-circuits every request.
///
/// **WHY THIS MATTERS**: Without decker nothing can run; the user needs install help instead
/// of a spawn error.
///
/// **BUG THIS CATCHES**: Would catch a request path that skips the install check.
#[tokio::test]
async fn given_missing_executable_when_requesting_anything_then_install_page_only() {
    // GIVEN: decker is not installed
    let h = Harness::new(false, ScriptedProbe::free());

    // WHEN: Start, stop and a build
    h.handle.start().await.unwrap();
    h.handle.stop().await.unwrap();
    let outcome = h.handle.run(OneShot::Build).await;

    // THEN: Three install pages, nothing probed or spawned
    assert_eq!(outcome, OneShotOutcome::NotInstalled);
    let pages = h.frontend.pages();
    assert_eq!(pages.len(), 3);
    assert!(
        pages
            .iter()
            .all(|page| matches!(page, Page::InstallHelp { command, .. } if command == "decker"))
    );
    assert!(h.probe.probed().is_empty());
    assert!(h.launcher.invocations().is_empty());
}

/// **VALUE**: Verifies negotiation gives up after the configured number of probes.
///
/// **WHY THIS MATTERS**: An unbounded search would hang the session when probing is broken
/// and every port looks occupied.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the attempt limit or a spawn after
/// exhaustion.
#[tokio::test]
async fn given_all_ports_occupied_when_starting_then_exhausted_and_idle() {
    // GIVEN: Every port occupied, five attempts allowed
    let mut config = test_config();
    config.server.max_port_attempts = 5;
    let h = Harness::with_config(true, ScriptedProbe::everything_occupied(), config);

    // WHEN: Starting
    let state = h.handle.start().await.unwrap();

    // THEN: Still idle after exactly five probes
    assert_eq!(state, ServerState::Idle);
    assert_eq!(h.probe.probed(), vec![8888, 8889, 8890, 8891, 8892]);
    assert!(h.launcher.invocations().is_empty());
    assert!(h.frontend.notices().contains(&Notice::error(
        "No free port found in 5 attempts starting at 8888."
    )));
}

/// **VALUE**: Verifies a spawn failure is logged and leaves the supervisor idle.
///
/// **WHY THIS MATTERS**: The executable can disappear between the check and the spawn.
///
/// **BUG THIS CATCHES**: Would catch a failed spawn being recorded as Running.
#[tokio::test]
async fn given_spawn_failure_when_starting_then_idle_with_error_logged() {
    let h = Harness::new(true, ScriptedProbe::free());
    h.launcher.fail_spawn.store(true, Ordering::SeqCst);

    let state = h.handle.start().await.unwrap();

    assert_eq!(state, ServerState::Idle);
    assert!(
        h.frontend
            .output()
            .iter()
            .any(|line| line.starts_with("[DECKER ERROR]") && line.contains("fake decker"))
    );
}

/// **VALUE**: Verifies server stderr raises one notice however many lines arrive.
///
/// **WHY THIS MATTERS**: A failing build prints a stack of error lines.
///
/// **BUG THIS CATCHES**: Would catch the server output not being wrapped.
#[tokio::test]
async fn given_server_writes_stderr_when_running_then_single_error_notice() {
    let h = Harness::new(true, ScriptedProbe::free());
    *h.launcher.server_stderr.lock().unwrap() =
        vec!["error: one".to_string(), "error: two".to_string()];

    h.handle.start().await.unwrap();

    let stderr_notices = h
        .frontend
        .notices()
        .into_iter()
        .filter(|n| n == &Notice::error(STDERR_NOTICE_MESSAGE))
        .count();
    assert_eq!(stderr_notices, 1);
    assert!(h.frontend.output().contains(&"server! error: two".to_string()));
}

/// **VALUE**: Verifies a start without a workspace is refused before any probe.
///
/// **WHY THIS MATTERS**: decker needs a directory to serve.
///
/// **BUG THIS CATCHES**: Would catch decker being started in the process working directory.
#[tokio::test]
async fn given_workspace_removed_when_starting_then_error_and_no_probe() {
    // GIVEN: The workspace directory no longer exists
    let h = Harness::new(true, ScriptedProbe::free());
    std::fs::remove_dir_all(h.workspace.path()).unwrap();

    // WHEN: Starting
    let state = h.handle.start().await.unwrap();

    // THEN: Refused
    assert_eq!(state, ServerState::Idle);
    assert!(h.probe.probed().is_empty());
    assert!(
        h.frontend
            .notices()
            .contains(&Notice::error(NO_WORKSPACE_SERVER_MESSAGE))
    );
}

/// **VALUE**: Verifies shutdown kills a running server.
///
/// **WHY THIS MATTERS**: Closing the session must not leave decker behind.
///
/// **BUG THIS CATCHES**: Would catch dispose forgetting the live process.
#[tokio::test]
async fn given_running_when_shutdown_then_killed_and_handle_stops_working() {
    let h = Harness::new(true, ScriptedProbe::free());
    let ServerState::Running { pid, .. } = h.handle.start().await.unwrap() else {
        panic!("Server should be running");
    };

    h.handle.shutdown().await.unwrap();

    timeout(TEST_TIMEOUT, async {
        while !h.launcher.killed().contains(&pid) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("Server was not killed on shutdown");
    assert!(h.handle.start().await.is_err());
}

// ============================================================================
// One-shot commands
// ============================================================================

/// **VALUE**: Verifies a build runs in the workspace and reports completion.
///
/// **WHY THIS MATTERS**: One-shots are fire-and-forget for the user; the notice is the only
/// feedback.
///
/// **BUG THIS CATCHES**: Would catch the completion notice or exit log missing.
#[tokio::test]
async fn given_installed_when_running_build_then_finished_with_notice() {
    let h = Harness::new(true, ScriptedProbe::free());

    let outcome = h.handle.run(OneShot::Build).await;

    assert!(outcome.is_success());
    let invocations = h.launcher.invocations();
    assert_eq!(invocations[0].args, vec!["-e"]);
    assert_eq!(invocations[0].working_dir, h.workspace.path());
    assert!(h.frontend.output().contains(&"build: working".to_string()));
    assert!(h.frontend.output().contains(&"[DECKER EXIT] decker build".to_string()));
    assert!(
        h.frontend
            .notices()
            .contains(&Notice::info("Finished building project."))
    );
    assert_eq!(h.handle.state(), ServerState::Idle);
}

/// **VALUE**: Verifies non-zero exit codes are logged.
///
/// **WHY THIS MATTERS**: The exit code is the only sign a publish failed.
///
/// **BUG THIS CATCHES**: Would catch non-zero codes being dropped from the log.
#[tokio::test]
async fn given_failing_publish_when_run_then_exit_code_logged() {
    let h = Harness::new(true, ScriptedProbe::free());
    *h.launcher.one_shot_exit.lock().unwrap() = Some(2);

    let outcome = h.handle.run(OneShot::Publish).await;

    assert_eq!(outcome, OneShotOutcome::Finished { code: Some(2) });
    assert!(!outcome.is_success());
    assert!(
        h.frontend
            .output()
            .contains(&"[DECKER EXIT] decker publish exitcode: 2".to_string())
    );
}

/// **VALUE**: Verifies a one-shot whose exit cannot be collected is reported to the user.
///
/// **WHY THIS MATTERS**: Without a notice the user waits for a completion message that
/// never comes.
///
/// **BUG THIS CATCHES**: Would catch runtime failures being logged but not surfaced.
#[tokio::test]
async fn given_failing_wait_when_running_build_then_error_logged_and_notified() {
    // GIVEN: A launcher whose one-shots fail while being waited on
    let h = Harness::new(true, ScriptedProbe::free());
    h.launcher.one_shot_fails.store(true, Ordering::SeqCst);

    // WHEN: Running a build
    let outcome = h.handle.run(OneShot::Build).await;

    // THEN: A failed outcome, the error logged and an informational notice
    assert_eq!(
        outcome,
        OneShotOutcome::Failed {
            message: "wait failed".to_string()
        }
    );
    assert!(h.frontend.output().contains(&"[DECKER ERROR] wait failed".to_string()));
    assert!(
        h.frontend
            .notices()
            .contains(&Notice::info("An error happened while running decker build."))
    );
}

/// **VALUE**: Verifies pdf export is refused on Windows without spawning.
///
/// **WHY THIS MATTERS**: decker cannot export PDF there.
///
/// **BUG THIS CATCHES**: Would catch the platform check being skipped.
#[tokio::test]
async fn given_windows_when_running_pdf_then_unsupported() {
    let workspace = tempfile::tempdir().unwrap();
    let frontend = Arc::new(RecordingFrontend::default());
    let launcher = Arc::new(FakeLauncher::default());
    let deps = Dependencies::new(
        test_config(),
        Some(workspace.path().to_path_buf()),
        frontend.clone(),
        frontend.clone(),
    )
    .with_resolver(Arc::new(FakeResolver(true)))
    .with_launcher(launcher.clone())
    .with_platform(Platform::Windows);
    let handle = Supervisor::spawn(deps);

    let outcome = handle.run(OneShot::Pdf).await;

    assert_eq!(outcome, OneShotOutcome::Unsupported);
    assert!(launcher.invocations().is_empty());
}

// ============================================================================
// Preview and browser URLs
// ============================================================================

/// **VALUE**: Verifies preview starts the server and frames the document's page.
///
/// **WHY THIS MATTERS**: Preview is usually the first thing a user does.
///
/// **BUG THIS CATCHES**: Would catch preview pointing at the root instead of the deck.
#[tokio::test]
async fn given_idle_when_previewing_markdown_then_server_started_and_preview_shown() {
    let h = Harness::new(true, ScriptedProbe::free());
    let document = h.workspace.path().join("intro-deck.md");

    let page = h.handle.open_preview(Some(&document)).await.unwrap();

    assert!(h.handle.state().is_running());
    assert_eq!(
        page,
        Page::Preview {
            url: "http://localhost:8888/intro-deck.html".to_string()
        }
    );
    assert_eq!(h.frontend.pages(), vec![page]);
}

/// **VALUE**: Verifies preview of a non-markdown file shows an error page.
///
/// **WHY THIS MATTERS**: There is nothing to preview for other files.
///
/// **BUG THIS CATCHES**: Would catch a frame pointing at a page that cannot exist.
#[tokio::test]
async fn given_text_file_when_previewing_then_error_page() {
    let h = Harness::new(true, ScriptedProbe::free());
    let document = h.workspace.path().join("notes.txt");

    let page = h.handle.open_preview(Some(&document)).await.unwrap();

    assert_eq!(page, Page::error(NOT_MARKDOWN_MESSAGE));
}

/// **VALUE**: Verifies browser URLs honour the deck folder.
///
/// **WHY THIS MATTERS**: The server runs inside the deck folder, so the folder is not part
/// of the URL.
///
/// **BUG THIS CATCHES**: Would catch the deck folder appearing in the URL.
#[tokio::test]
async fn given_deck_folder_when_resolving_browser_url_then_relative_to_folder() {
    let mut config = test_config();
    config.deck_folder = Some("notes".to_string());
    let h = Harness::with_config(true, ScriptedProbe::free(), config);
    let document = h.workspace.path().join("notes").join("lecture1.md");

    let url = h.handle.browser_url(Some(&document)).await.unwrap();

    assert_eq!(url.as_deref(), Some("http://localhost:8888/lecture1.html"));
    let invocations = h.launcher.invocations();
    assert_eq!(invocations[0].working_dir, h.workspace.path().join("notes"));
}

/// **VALUE**: Verifies a browser request without a document reports an error and starts
/// nothing.
///
/// **WHY THIS MATTERS**: There is no page to open.
///
/// **BUG THIS CATCHES**: Would catch a server being started for nothing.
#[tokio::test]
async fn given_no_document_when_resolving_browser_url_then_none_and_error() {
    let h = Harness::new(true, ScriptedProbe::free());

    let url = h.handle.browser_url(None).await.unwrap();

    assert_eq!(url, None);
    assert!(h.launcher.invocations().is_empty());
    assert!(
        h.frontend
            .notices()
            .contains(&Notice::error(NO_DOCUMENT_MESSAGE))
    );
}
