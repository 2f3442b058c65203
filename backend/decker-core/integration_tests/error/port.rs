use decker_core::error::port::PortError;

use common::ErrorLocation;

use std::error::Error;
use std::io::Error as IoError;
use std::io::ErrorKind;

/// **VALUE**: Verifies the exhaustion message names the start port and attempt count.
///
/// **WHY THIS MATTERS**: Users need both to pick a different starting port.
///
/// **BUG THIS CATCHES**: Would catch the fields being swapped in the message.
#[test]
fn given_exhausted_error_when_formatted_then_names_start_and_attempts() {
    let err = PortError::Exhausted {
        start: 8888,
        attempts: 100,
        location: ErrorLocation::here(),
    };

    let error_string = err.to_string();

    assert!(error_string.contains("no free port in 100 attempts starting at 8888"));
    assert!(error_string.contains("port.rs"));
}

/// **VALUE**: Verifies probe failures keep the underlying OS error.
///
/// **WHY THIS MATTERS**: "lsof: not found" is the usual cause and must stay visible.
///
/// **BUG THIS CATCHES**: Would catch the source chain being cut.
#[test]
fn given_probe_error_when_source_requested_then_io_error_returned() {
    let err = PortError::Probe {
        port: 8888,
        message: "Failed to run 'lsof' for port 8888".to_string(),
        location: ErrorLocation::here(),
        source: Box::new(IoError::new(ErrorKind::NotFound, "lsof not found")),
    };

    assert!(err.to_string().starts_with("Port Probe Error: Failed to run 'lsof'"));
    assert_eq!(err.source().unwrap().to_string(), "lsof not found");
}
