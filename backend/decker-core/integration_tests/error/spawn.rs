use decker_core::error::spawn::SpawnError;

use common::ErrorLocation;

use std::error::Error;
use std::io::Error as IoError;
use std::io::ErrorKind;

/// **VALUE**: Verifies that `SpawnError::Spawn` renders its kind, message and location.
///
/// **WHY THIS MATTERS**: The server and every one-shot are spawned from different places;
/// the location says which one failed.
///
/// **BUG THIS CATCHES**: Would catch the location being dropped from the Display format.
#[test]
fn given_spawn_error_when_formatted_then_includes_location() {
    // GIVEN: A Spawn error created here
    let err = SpawnError::Spawn {
        message: "Failed to spawn 'decker --server -p 8888 -e'".to_string(),
        location: ErrorLocation::here(),
        source: Box::new(IoError::new(ErrorKind::NotFound, "No such file")),
    };

    // WHEN: Formatting the error
    let error_string = err.to_string();

    // THEN: Kind, message and file location present
    assert!(error_string.starts_with("Spawn Error: Failed to spawn"));
    assert!(error_string.contains("[spawn.rs:"));
}

/// **VALUE**: Verifies that the OS error stays reachable through `source()`.
///
/// **WHY THIS MATTERS**: Callers distinguish "not found" from "permission denied".
///
/// **BUG THIS CATCHES**: Would catch a missing `#[source]` attribute.
#[test]
fn given_spawn_error_when_source_requested_then_io_error_returned() {
    let err = SpawnError::Spawn {
        message: "Failed to spawn".to_string(),
        location: ErrorLocation::here(),
        source: Box::new(IoError::new(ErrorKind::PermissionDenied, "denied")),
    };

    let source = err.source().expect("Spawn error should have a source");

    assert_eq!(source.to_string(), "denied");
}

#[test]
fn given_timeout_error_when_formatted_then_has_no_source() {
    let err = SpawnError::Timeout {
        message: "Decker server did not answer".to_string(),
        location: ErrorLocation::here(),
    };

    assert!(err.to_string().starts_with("Timeout Error: Decker server did not answer ["));
    assert!(err.source().is_none());
}
