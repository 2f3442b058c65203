use decker_core::error::CoreError;
use decker_core::error::config::ConfigError;

use common::ErrorLocation;

use std::path::PathBuf;

/// **VALUE**: Verifies config errors name the file they concern.
///
/// **WHY THIS MATTERS**: Users may have several config directories.
///
/// **BUG THIS CATCHES**: Would catch the path missing from the message.
#[test]
fn given_parse_error_when_formatted_then_names_path_and_reason() {
    let err = ConfigError::ParseError {
        location: ErrorLocation::here(),
        path: PathBuf::from("/home/me/.config/decker-server/config.json"),
        reason: "expected value at line 1 column 1".to_string(),
    };

    let error_string = err.to_string();

    assert!(error_string.starts_with("Config Parse Error: /home/me/.config/decker-server/config.json"));
    assert!(error_string.contains("expected value at line 1 column 1"));
}

/// **VALUE**: Verifies `CoreError` wraps module errors transparently.
///
/// **WHY THIS MATTERS**: Front ends print `CoreError` and expect the inner message unchanged.
///
/// **BUG THIS CATCHES**: Would catch a prefix being added by the wrapper.
#[test]
fn given_config_error_when_converted_to_core_error_then_message_unchanged() {
    let err = ConfigError::ValidationError {
        location: ErrorLocation::here(),
        reason: "server.port must be between 1 and 65535".to_string(),
    };
    let expected = err.to_string();

    let core: CoreError = err.into();

    assert_eq!(core.to_string(), expected);
}
