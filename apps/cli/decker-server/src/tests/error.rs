// Unit tests for error module

use crate::error::AppError;

use decker_core::error::config::ConfigError;
use decker_core::error::supervisor::SupervisorError;

use common::ErrorLocation;

/// **VALUE**: Verifies that app errors render kind, message and location.
///
/// **WHY THIS MATTERS**: main prints the error as its last words; the location is what a
/// bug report needs.
///
/// **BUG THIS CATCHES**: Would catch the location being dropped from the Display format.
#[test]
fn given_not_running_error_when_formatted_then_includes_location() {
    let err = AppError::NotRunning {
        message: "The decker server could not be started".to_string(),
        location: ErrorLocation::here(),
    };

    let error_string = err.to_string();

    assert!(error_string.starts_with("Not Running Error: The decker server could not be started"));
    assert!(error_string.contains("error.rs:"));
}

/// **VALUE**: Verifies core errors convert into `AppError::Core` with their message.
///
/// **WHY THIS MATTERS**: Commands use `?` on core results throughout.
///
/// **BUG THIS CATCHES**: Would catch a conversion that loses the inner message.
#[test]
fn given_core_errors_when_converted_then_core_variant_keeps_message() {
    let config_err = ConfigError::ValidationError {
        location: ErrorLocation::here(),
        reason: "server.port must be between 1 and 65535".to_string(),
    };
    let supervisor_err = SupervisorError::Stopped {
        message: "Supervisor is no longer running".to_string(),
        location: ErrorLocation::here(),
    };

    let from_config = AppError::from(config_err);
    let from_supervisor = AppError::from(supervisor_err);

    match (from_config, from_supervisor) {
        (AppError::Core { message: a, .. }, AppError::Core { message: b, .. }) => {
            assert!(a.contains("server.port must be between 1 and 65535"));
            assert!(b.contains("Supervisor is no longer running"));
        }
        other => panic!("Expected Core errors, got {other:?}"),
    }
}
