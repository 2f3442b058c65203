use crate::error::spawn::SpawnError;
use crate::process::Invocation;
use crate::ui::OutputSink;

use common::ErrorLocation;

use std::borrow::Cow;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, trace, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, copy, sink as sink_writer};
use tokio::process::Child as TokioChild;
use tokio::process::Command as TokioCommand;
use tokio::spawn as TokioSpawn;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// How long exit reporting waits for the output relays to drain.
const RELAY_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Final outcome of a launched process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReport {
    /// The process ended; `code` is `None` when it was terminated by a signal.
    Exited { code: Option<i32> },
    /// Waiting on the process failed.
    Failed { message: String },
}

/// A running child process as seen by its owner.
///
/// Sending on (or dropping) `kill` terminates the process; `exit` resolves
/// once it is gone.
#[derive(Debug)]
pub struct Launched {
    pub pid: u32,
    pub kill: oneshot::Sender<()>,
    pub exit: oneshot::Receiver<ExitReport>,
}

/// Starts decker invocations. Output is relayed to `sink` line by line.
pub trait ProcessLauncher: Send + Sync {
    fn launch(
        &self,
        invocation: &Invocation,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Launched, SpawnError>;
}

/// Launcher backed by `tokio::process`. Must be called inside a runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

pub(crate) fn build_command(invocation: &Invocation) -> TokioCommand {
    let mut cmd = TokioCommand::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

impl ProcessLauncher for TokioLauncher {
    #[track_caller]
    fn launch(
        &self,
        invocation: &Invocation,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Launched, SpawnError> {
        debug!(
            "Spawning '{}' in {}",
            invocation.command_line(),
            invocation.working_dir.display()
        );

        let mut child = build_command(invocation)
            .spawn()
            .map_err(|e| SpawnError::Spawn {
                message: format!("Failed to spawn '{}': {e}", invocation.command_line()),
                location: ErrorLocation::here(),
                source: Box::new(e),
            })?;

        let pid = child.id().unwrap_or_default();
        info!("Spawned {} (PID: {pid})", invocation.label);

        let mut relays = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            relays.push(relay(stdout, invocation.label.clone(), Arc::clone(&sink), false));
        }
        if let Some(stderr) = child.stderr.take() {
            relays.push(relay(stderr, invocation.label.clone(), sink, true));
        }

        let (kill_tx, kill_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = oneshot::channel();

        TokioSpawn(watch_child(child, pid, relays, kill_rx, exit_tx));

        Ok(Launched {
            pid,
            kill: kill_tx,
            exit: exit_rx,
        })
    }
}

/// Text of one raw output line without its terminator. Bytes that are not
/// UTF-8 are replaced rather than rejected.
pub(crate) fn line_text(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

fn relay<R>(reader: R, label: String, sink: Arc<dyn OutputSink>, is_stderr: bool) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    TokioSpawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = line_text(&buf);
                    if is_stderr {
                        sink.stderr(&label, &line);
                    } else {
                        sink.stdout(&label, &line);
                    }
                }
                Err(e) => {
                    // Closing the pipe early would hand the child a SIGPIPE.
                    warn!("Output relay for {label} failed, discarding the rest: {e}");
                    if let Err(e) = copy(&mut reader, &mut sink_writer()).await {
                        trace!("Output drain for {label} stopped: {e}");
                    }
                    break;
                }
            }
        }
    })
}

async fn watch_child(
    mut child: TokioChild,
    pid: u32,
    relays: Vec<JoinHandle<()>>,
    kill_rx: oneshot::Receiver<()>,
    exit_tx: oneshot::Sender<ExitReport>,
) {
    let waited = tokio::select! {
        status = child.wait() => status,
        _ = kill_rx => {
            debug!("Kill requested for PID {pid}");
            if let Err(e) = child.kill().await {
                warn!("Failed to kill PID {pid}: {e}");
            }
            child.wait().await
        }
    };

    for handle in relays {
        if timeout(RELAY_DRAIN_TIMEOUT, handle).await.is_err() {
            trace!("Output relay for PID {pid} still open after exit");
        }
    }

    let report = match waited {
        Ok(status) => {
            debug!("PID {pid} exited with {status}");
            ExitReport::Exited {
                code: status.code(),
            }
        }
        Err(e) => ExitReport::Failed {
            message: format!("Failed to wait for PID {pid}: {e}"),
        },
    };

    // The owner may already be gone.
    let _ = exit_tx.send(report);
}
