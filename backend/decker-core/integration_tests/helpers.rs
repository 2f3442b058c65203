//! Test doubles for supervisor integration tests.
//!
//! - `FakeResolver`: fixed answer for the install check
//! - `ScriptedProbe`: fixed set of occupied ports, records every probe
//! - `FakeLauncher`: records invocations, lets tests crash the server
//! - `RecordingFrontend`: records notices, pages, status lines and output

use decker_core::config::DeckerConfig;
use decker_core::error::port::PortError;
use decker_core::error::spawn::SpawnError;
use decker_core::port::PortProbe;
use decker_core::process::{ExitReport, Invocation, Launched, ProcessLauncher};
use decker_core::resolve::ExecutableResolver;
use decker_core::supervisor::{Dependencies, Supervisor, SupervisorHandle};
use decker_core::ui::{Notice, Notifier, OutputSink, StatusLine};
use decker_core::view::Page;

use common::ErrorLocation;

use std::collections::{HashMap, HashSet};
use std::io::{Error as IoError, ErrorKind};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::oneshot;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FakeResolver(pub bool);

impl ExecutableResolver for FakeResolver {
    fn is_installed(&self, _command: &str) -> bool {
        self.0
    }
}

/// Probe answering from a fixed set of occupied ports.
#[derive(Default)]
pub struct ScriptedProbe {
    occupied: HashSet<u16>,
    all_occupied: bool,
    probed: Mutex<Vec<u16>>,
}

impl ScriptedProbe {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn occupied(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            occupied: ports.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn everything_occupied() -> Self {
        Self {
            all_occupied: true,
            ..Self::default()
        }
    }

    pub fn probed(&self) -> Vec<u16> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortProbe for ScriptedProbe {
    async fn is_occupied(&self, port: u16) -> Result<bool, PortError> {
        self.probed.lock().unwrap().push(port);
        Ok(self.all_occupied || self.occupied.contains(&port))
    }
}

/// Launcher that never starts a real process.
///
/// Server invocations stay alive until killed or crashed via [`FakeLauncher::crash`];
/// one-shots exit immediately with `one_shot_exit`, or report a failed wait when
/// `one_shot_fails` is set.
pub struct FakeLauncher {
    next_pid: AtomicU32,
    invocations: Mutex<Vec<Invocation>>,
    killed: Arc<Mutex<Vec<u32>>>,
    crashes: Mutex<HashMap<u32, oneshot::Sender<Option<i32>>>>,
    pub fail_spawn: AtomicBool,
    pub one_shot_exit: Mutex<Option<i32>>,
    pub one_shot_fails: AtomicBool,
    pub server_stderr: Mutex<Vec<String>>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            next_pid: AtomicU32::new(1000),
            invocations: Mutex::new(Vec::new()),
            killed: Arc::new(Mutex::new(Vec::new())),
            crashes: Mutex::new(HashMap::new()),
            fail_spawn: AtomicBool::new(false),
            one_shot_exit: Mutex::new(Some(0)),
            one_shot_fails: AtomicBool::new(false),
            server_stderr: Mutex::new(Vec::new()),
        }
    }
}

impl FakeLauncher {
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.killed.lock().unwrap().clone()
    }

    /// Make the server with `pid` exit on its own with `code`.
    pub fn crash(&self, pid: u32, code: Option<i32>) {
        let sender = self
            .crashes
            .lock()
            .unwrap()
            .remove(&pid)
            .expect("No live fake process with that pid");
        sender.send(code).expect("Fake process already gone");
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(
        &self,
        invocation: &Invocation,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Launched, SpawnError> {
        self.invocations.lock().unwrap().push(invocation.clone());

        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(SpawnError::Spawn {
                message: "Failed to spawn fake decker".to_string(),
                location: ErrorLocation::here(),
                source: Box::new(IoError::new(ErrorKind::NotFound, "No such file")),
            });
        }

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let (exit_tx, exit_rx) = oneshot::channel();

        if invocation.label != "server" {
            sink.stdout(&invocation.label, "working");
            let report = if self.one_shot_fails.load(Ordering::SeqCst) {
                ExitReport::Failed {
                    message: "wait failed".to_string(),
                }
            } else {
                ExitReport::Exited {
                    code: *self.one_shot_exit.lock().unwrap(),
                }
            };
            let _ = exit_tx.send(report);
            return Ok(Launched {
                pid,
                kill: kill_tx,
                exit: exit_rx,
            });
        }

        for line in self.server_stderr.lock().unwrap().iter() {
            sink.stderr(&invocation.label, line);
        }

        let (crash_tx, crash_rx) = oneshot::channel::<Option<i32>>();
        self.crashes.lock().unwrap().insert(pid, crash_tx);

        let killed = Arc::clone(&self.killed);
        tokio::spawn(async move {
            let code = tokio::select! {
                _ = kill_rx => {
                    killed.lock().unwrap().push(pid);
                    None
                }
                code = crash_rx => code.unwrap_or(None),
            };
            let _ = exit_tx.send(ExitReport::Exited { code });
        });

        Ok(Launched {
            pid,
            kill: kill_tx,
            exit: exit_rx,
        })
    }
}

#[derive(Default)]
pub struct RecordingFrontend {
    notices: Mutex<Vec<Notice>>,
    pages: Mutex<Vec<Page>>,
    statuses: Mutex<Vec<StatusLine>>,
    output: Mutex<Vec<String>>,
}

impl RecordingFrontend {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn pages(&self) -> Vec<Page> {
        self.pages.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<StatusLine> {
        self.statuses.lock().unwrap().last().copied()
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }
}

impl Notifier for RecordingFrontend {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn show_page(&self, page: &Page) {
        self.pages.lock().unwrap().push(page.clone());
    }

    fn status_changed(&self, status: StatusLine) {
        self.statuses.lock().unwrap().push(status);
    }
}

impl OutputSink for RecordingFrontend {
    fn stdout(&self, source: &str, line: &str) {
        self.output.lock().unwrap().push(format!("{source}: {line}"));
    }

    fn stderr(&self, source: &str, line: &str) {
        self.output.lock().unwrap().push(format!("{source}! {line}"));
    }

    fn log(&self, line: &str) {
        self.output.lock().unwrap().push(line.to_string());
    }
}

/// A supervisor wired to fakes, with a temporary workspace.
pub struct Harness {
    pub handle: SupervisorHandle,
    pub frontend: Arc<RecordingFrontend>,
    pub launcher: Arc<FakeLauncher>,
    pub probe: Arc<ScriptedProbe>,
    pub workspace: TempDir,
}

impl Harness {
    pub fn new(installed: bool, probe: ScriptedProbe) -> Self {
        Self::with_config(installed, probe, test_config())
    }

    pub fn with_config(installed: bool, probe: ScriptedProbe, config: DeckerConfig) -> Self {
        let workspace = tempfile::tempdir().expect("Failed to create workspace");
        if let Some(folder) = &config.deck_folder {
            std::fs::create_dir_all(workspace.path().join(folder))
                .expect("Failed to create deck folder");
        }

        let frontend = Arc::new(RecordingFrontend::default());
        let launcher = Arc::new(FakeLauncher::default());
        let probe = Arc::new(probe);

        let deps = Dependencies::new(
            config,
            Some(workspace.path().to_path_buf()),
            frontend.clone(),
            frontend.clone(),
        )
        .with_resolver(Arc::new(FakeResolver(installed)))
        .with_probe(probe.clone())
        .with_launcher(launcher.clone());

        Self {
            handle: Supervisor::spawn(deps),
            frontend,
            launcher,
            probe,
            workspace,
        }
    }
}

/// Defaults with no readiness wait, so tests never poll a real port.
pub fn test_config() -> DeckerConfig {
    let mut config = DeckerConfig::default();
    config.server.ready_timeout_secs = 0;
    config
}
