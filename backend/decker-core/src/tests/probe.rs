use crate::Platform;
use crate::port::probe::build_probe_command;
use crate::port::probe_invocation;

/// **VALUE**: Verifies the Windows occupancy check command.
///
/// **WHY THIS MATTERS**: The exit status of this exact PowerShell call is the only signal
/// used to decide whether a port is taken.
///
/// **BUG THIS CATCHES**: Would catch the port being split into a separate argument, which
/// PowerShell would not bind to `-LocalPort`.
#[test]
fn given_windows_when_building_probe_then_uses_get_net_tcp_connection() {
    let (program, args) = probe_invocation(Platform::Windows, 8888);

    assert_eq!(program, "powershell.exe");
    assert_eq!(args, vec!["Get-NetTCPConnection -LocalPort 8888"]);
}

/// **VALUE**: Verifies the lsof occupancy check command.
///
/// **WHY THIS MATTERS**: `-P -n` keep lsof from resolving names, which can take seconds per
/// probe.
///
/// **BUG THIS CATCHES**: Would catch missing flags or a malformed `-i:` filter.
#[test]
fn given_unix_when_building_probe_then_uses_lsof_filtered_by_port() {
    let (program, args) = probe_invocation(Platform::Unix, 8889);

    assert_eq!(program, "lsof");
    assert_eq!(args, vec!["-i:8889", "-P", "-n"]);
}

/// **VALUE**: Verifies the probe command is built from the invocation.
///
/// **WHY THIS MATTERS**: The command is what actually runs.
///
/// **BUG THIS CATCHES**: Would catch the builder ignoring the platform or port.
#[test]
fn given_probe_invocation_when_building_command_then_program_and_args_match() {
    let cmd = build_probe_command(Platform::Unix, 4000);
    let std_cmd = cmd.as_std();

    assert_eq!(std_cmd.get_program(), "lsof");
    let args: Vec<_> = std_cmd.get_args().collect();
    assert_eq!(args, vec!["-i:4000", "-P", "-n"]);
}
