use crate::Platform;
use crate::config::ProbeKind;
use crate::error::port::PortError;
use crate::port::PortProbe;

use common::ErrorLocation;

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use log::trace;
use netstat2::{AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, get_sockets_info};
use tokio::process::Command as TokioCommand;

const POWERSHELL_PROGRAM: &str = "powershell.exe";
const LSOF_PROGRAM: &str = "lsof";

/// Program and arguments of the occupancy check for `port`.
///
/// Both commands exit with 0 when something uses the port and non-zero
/// otherwise.
pub fn probe_invocation(platform: Platform, port: u16) -> (&'static str, Vec<String>) {
    match platform {
        Platform::Windows => (
            POWERSHELL_PROGRAM,
            vec![format!("Get-NetTCPConnection -LocalPort {port}")],
        ),
        Platform::Unix => (
            LSOF_PROGRAM,
            vec![format!("-i:{port}"), "-P".to_string(), "-n".to_string()],
        ),
    }
}

pub(crate) fn build_probe_command(platform: Platform, port: u16) -> TokioCommand {
    let (program, args) = probe_invocation(platform, port);
    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Probe that shells out to `lsof` or PowerShell and reads the exit status.
#[derive(Debug, Clone, Copy)]
pub struct CommandProbe {
    platform: Platform,
}

impl CommandProbe {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortProbe for CommandProbe {
    async fn is_occupied(&self, port: u16) -> Result<bool, PortError> {
        let status = build_probe_command(self.platform, port)
            .status()
            .await
            .map_err(|e| {
                let (program, _) = probe_invocation(self.platform, port);
                PortError::Probe {
                    port,
                    message: format!(
                        "Failed to run '{program}' for port {port}: {e} (set server.probe to \"socket-table\" to avoid the external command)"
                    ),
                    location: ErrorLocation::here(),
                    source: Box::new(e),
                }
            })?;

        trace!("Port probe for {port} exited with {status}");
        Ok(status.success())
    }
}

/// Probe that looks the port up in the OS socket table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketTableProbe;

#[async_trait]
impl PortProbe for SocketTableProbe {
    async fn is_occupied(&self, port: u16) -> Result<bool, PortError> {
        let sockets = get_sockets_info(
            AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6,
            ProtocolFlags::TCP,
        )
        .map_err(|e| PortError::Probe {
            port,
            message: format!("Failed to query network sockets: {e}"),
            location: ErrorLocation::here(),
            source: Box::new(e),
        })?;

        let occupied = sockets.iter().any(|s| {
            matches!(&s.protocol_socket_info, ProtocolSocketInfo::Tcp(tcp) if tcp.local_port == port)
        });

        trace!("Socket table lookup for {port}: occupied={occupied}");
        Ok(occupied)
    }
}

/// Probe implementation selected by configuration.
pub fn probe_for(kind: ProbeKind) -> Arc<dyn PortProbe> {
    match kind {
        ProbeKind::Command => Arc::new(CommandProbe::new()),
        ProbeKind::SocketTable => Arc::new(SocketTableProbe),
    }
}
