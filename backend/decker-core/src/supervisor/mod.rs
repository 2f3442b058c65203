//! The decker server supervisor.
//!
//! A single actor task owns the server state. Requests from the front end
//! and exit events from the running process arrive on the same channel and
//! are handled one at a time, so the state never needs a lock.
//!
//! # Lifecycle
//!
//! [`Supervisor::spawn`] starts the actor and returns a cloneable
//! [`SupervisorHandle`]. The actor ends on [`SupervisorHandle::shutdown`] or
//! when the last handle is dropped; either way a live server is killed.

pub mod browse;
pub mod deps;
pub mod machine;
pub mod one_shot;
pub(crate) mod output;

pub use deps::Dependencies;
pub use machine::{Effect, ServerEvent, ServerState, Transition, transition};
pub use one_shot::OneShotOutcome;
pub use output::STDERR_NOTICE_MESSAGE;

use crate::config::DeckerConfig;
use crate::error::port::PortError;
use crate::error::supervisor::SupervisorError;
use crate::port::PortNegotiator;
use crate::process::{ExitReport, Invocation, Launched, OneShot};
use crate::ui::{Notice, OutputSink, StatusLine};
use crate::view::Page;

use output::ServerOutput;

use common::ErrorLocation;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::spawn as TokioSpawn;
use tokio::sync::{mpsc, oneshot, watch};

const COMMAND_CHANNEL_CAPACITY: usize = 100;

pub const NO_WORKSPACE_SERVER_MESSAGE: &str = "No workspace is open to start a decker server in.";

enum Message {
    Request {
        event: ServerEvent,
        reply: oneshot::Sender<ServerState>,
    },
    Process(ServerEvent),
    Shutdown(oneshot::Sender<()>),
}

struct LiveServer {
    pid: u32,
    kill: oneshot::Sender<()>,
}

/// Owner of the server process. Only reachable through its handle.
pub struct Supervisor {
    deps: Arc<Dependencies>,
    state: ServerState,
    live: Option<LiveServer>,
    events: mpsc::WeakSender<Message>,
    state_tx: watch::Sender<ServerState>,
}

impl Supervisor {
    /// Start the supervisor actor. Must be called inside a tokio runtime.
    pub fn spawn(deps: Dependencies) -> SupervisorHandle {
        let deps = Arc::new(deps);
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ServerState::Idle);

        let supervisor = Supervisor {
            deps: Arc::clone(&deps),
            state: ServerState::Idle,
            live: None,
            events: tx.downgrade(),
            state_tx,
        };

        TokioSpawn(supervisor.run(rx));

        SupervisorHandle { tx, state_rx, deps }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Message>) {
        info!("Supervisor started");

        while let Some(message) = rx.recv().await {
            match message {
                Message::Request { event, reply } => {
                    self.handle_request(event).await;
                    let _ = reply.send(self.state);
                }
                Message::Process(event) => self.apply(event).await,
                Message::Shutdown(reply) => {
                    self.dispose();
                    let _ = reply.send(());
                    break;
                }
            }
        }

        self.dispose();
        info!("Supervisor stopped");
    }

    /// Requests from the front end all require the executable first.
    async fn handle_request(&mut self, event: ServerEvent) {
        if !self.deps.is_installed() {
            warn!("'{}' is not installed, showing install help", self.deps.command());
            self.deps
                .notifier
                .show_page(&Page::install_help(self.deps.command()));
            self.refresh();
            return;
        }

        self.apply(event).await;
    }

    async fn apply(&mut self, event: ServerEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            debug!("Supervisor event {event:?} in state {:?}", self.state);

            let Transition { state, effects } = transition(self.state, event);
            self.state = state;

            for effect in effects {
                if let Some(next) = self.perform(effect).await {
                    pending.push_back(next);
                }
            }
        }
    }

    async fn perform(&mut self, effect: Effect) -> Option<ServerEvent> {
        match effect {
            Effect::BeginStart => return self.begin_start().await,
            Effect::Kill { pid } => {
                if let Some(live) = self.take_live(pid) {
                    info!("Stopping decker server (PID {pid})");
                    let _ = live.kill.send(());
                }
            }
            Effect::Release { pid } => {
                self.take_live(pid);
            }
            Effect::Notify(notice) => self.deps.notifier.notify(notice),
            Effect::Log(line) => self.deps.sink.log(&line),
            Effect::Refresh => self.refresh(),
        }
        None
    }

    async fn begin_start(&mut self) -> Option<ServerEvent> {
        let deps = Arc::clone(&self.deps);

        if self.live.is_some() {
            warn!("Start requested while a server handle is still held");
            return None;
        }

        let Some(workspace) = deps.workspace_dir() else {
            deps.notifier.notify(Notice::error(NO_WORKSPACE_SERVER_MESSAGE));
            return None;
        };

        let working_dir = deps.config.working_directory(workspace);
        if !working_dir.is_dir() {
            deps.notifier.notify(Notice::error(format!(
                "Deck folder {} does not exist.",
                working_dir.display()
            )));
            return None;
        }

        let negotiator =
            PortNegotiator::new(Arc::clone(&deps.probe), deps.config.server.max_port_attempts);

        let port = match negotiator.negotiate(deps.config.server.port).await {
            Ok(port) => port,
            Err(e) => {
                error!("Port negotiation failed: {e}");
                deps.sink.log(&format!("[DECKER ERROR] {e}"));
                deps.notifier.notify(Notice::error(describe_port_error(&e)));
                return None;
            }
        };

        let invocation = Invocation::server(deps.command(), port, &working_dir);
        let sink: Arc<dyn OutputSink> = Arc::new(ServerOutput::new(
            Arc::clone(&deps.sink),
            Arc::clone(&deps.notifier),
        ));

        match deps.launcher.launch(&invocation, sink) {
            Ok(Launched { pid, kill, exit }) => {
                self.live = Some(LiveServer { pid, kill });
                self.watch_exit(pid, exit);
                Some(ServerEvent::Spawned {
                    pid,
                    port,
                    working_dir: working_dir.display().to_string(),
                })
            }
            Err(e) => {
                error!("Failed to start decker server: {e}");
                Some(ServerEvent::SpawnFailed {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Feed the process exit back into the actor as an event.
    fn watch_exit(&self, pid: u32, exit: oneshot::Receiver<ExitReport>) {
        let events = self.events.clone();

        TokioSpawn(async move {
            let event = match exit.await {
                Ok(ExitReport::Exited { code }) => ServerEvent::Exited { pid, code },
                Ok(ExitReport::Failed { message }) => ServerEvent::Errored { pid, message },
                Err(_) => ServerEvent::Errored {
                    pid,
                    message: format!("Lost track of decker server (PID {pid})"),
                },
            };

            if let Some(tx) = events.upgrade() {
                let _ = tx.send(Message::Process(event)).await;
            }
        });
    }

    fn take_live(&mut self, pid: u32) -> Option<LiveServer> {
        match &self.live {
            Some(live) if live.pid == pid => self.live.take(),
            _ => None,
        }
    }

    fn refresh(&self) {
        self.state_tx.send_replace(self.state);
        self.deps
            .notifier
            .status_changed(StatusLine::from(self.state));
    }

    /// Kill the live server, if any, and return to Idle.
    fn dispose(&mut self) {
        if let Some(live) = self.live.take() {
            info!("Disposing supervisor, stopping PID {}", live.pid);
            let _ = live.kill.send(());
        }
        if self.state.is_running() {
            self.state = ServerState::Idle;
            self.refresh();
        }
    }
}

fn describe_port_error(error: &PortError) -> String {
    match error {
        PortError::Exhausted {
            start, attempts, ..
        } => format!("No free port found in {attempts} attempts starting at {start}."),
        PortError::Probe { message, .. } => format!("Unable to check for a free port: {message}"),
    }
}

/// Cloneable front door to the supervisor actor.
#[derive(Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<Message>,
    state_rx: watch::Receiver<ServerState>,
    deps: Arc<Dependencies>,
}

impl SupervisorHandle {
    pub async fn start(&self) -> Result<ServerState, SupervisorError> {
        self.request(ServerEvent::StartRequested).await
    }

    pub async fn stop(&self) -> Result<ServerState, SupervisorError> {
        self.request(ServerEvent::StopRequested).await
    }

    pub async fn toggle(&self) -> Result<ServerState, SupervisorError> {
        self.request(ServerEvent::ToggleRequested).await
    }

    /// Run a one-shot command to completion. Independent of the server state.
    pub async fn run(&self, command: OneShot) -> OneShotOutcome {
        one_shot::run(&self.deps, command).await
    }

    /// Last published server state.
    pub fn state(&self) -> ServerState {
        *self.state_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.state_rx.clone()
    }

    /// Resolve once the server is no longer running.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe();
        if rx.wait_for(|state| !state.is_running()).await.is_err() {
            debug!("Supervisor gone while waiting for idle");
        }
    }

    pub fn config(&self) -> &DeckerConfig {
        &self.deps.config
    }

    pub fn workspace(&self) -> Option<&Path> {
        self.deps.workspace.as_deref()
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    /// Stop the actor, killing a live server.
    pub async fn shutdown(&self) -> Result<(), SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Shutdown(reply_tx))
            .await
            .map_err(|_| stopped_error())?;
        reply_rx.await.map_err(|_| stopped_error())
    }

    async fn request(&self, event: ServerEvent) -> Result<ServerState, SupervisorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Request {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| stopped_error())?;
        reply_rx.await.map_err(|_| stopped_error())
    }
}

#[track_caller]
fn stopped_error() -> SupervisorError {
    SupervisorError::Stopped {
        message: "Supervisor is no longer running".to_string(),
        location: ErrorLocation::here(),
    }
}
