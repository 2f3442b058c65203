// Unit tests for config validation and path helpers
// File round-trips live in integration_tests/config.rs

use crate::config::{DeckerConfig, ProbeKind, expand_placeholders};
use crate::error::config::ConfigError;

use std::path::Path;

/// **VALUE**: Verifies that the defaults describe a usable setup.
///
/// **WHY THIS MATTERS**: A missing config file falls back to these values.
///
/// **BUG THIS CATCHES**: Would catch defaults drifting from `decker` on port 8888.
#[test]
fn given_default_config_when_inspected_then_uses_decker_on_8888() {
    let config = DeckerConfig::default();

    assert_eq!(config.executable.command, "decker");
    assert_eq!(config.server.port, 8888);
    assert!(!config.server.autostart);
    assert_eq!(config.server.max_port_attempts, 100);
    assert_eq!(config.server.probe, ProbeKind::Command);
    assert!(config.validate().is_ok());
}

/// **VALUE**: Verifies that partial JSON fills in the remaining defaults.
///
/// **WHY THIS MATTERS**: Users typically only set the one key they care about.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` making every key required.
#[test]
fn given_partial_json_when_parsed_then_missing_keys_use_defaults() {
    let json = r#"{ "server": { "port": 9000, "probe": "socket-table" } }"#;

    let config: DeckerConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.probe, ProbeKind::SocketTable);
    assert_eq!(config.executable.command, "decker");
    assert_eq!(config.server.ready_timeout_secs, 20);
}

/// **VALUE**: Verifies that invalid values are rejected with a validation error.
///
/// **WHY THIS MATTERS**: Port 0 or zero attempts would make negotiation meaningless.
///
/// **BUG THIS CATCHES**: Would catch a validation rule being dropped.
#[test]
fn given_invalid_values_when_validating_then_validation_error() {
    let mut empty_command = DeckerConfig::default();
    empty_command.executable.command = "  ".to_string();

    let mut zero_port = DeckerConfig::default();
    zero_port.server.port = 0;

    let mut zero_attempts = DeckerConfig::default();
    zero_attempts.server.max_port_attempts = 0;

    let mut empty_folder = DeckerConfig::default();
    empty_folder.deck_folder = Some(String::new());

    let mut future_version = DeckerConfig::default();
    future_version.version = 2;

    for config in [
        empty_command,
        zero_port,
        zero_attempts,
        empty_folder,
        future_version,
    ] {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}

/// **VALUE**: Verifies the working directory with and without a deck folder.
///
/// **WHY THIS MATTERS**: decker is started in this directory; it decides which decks exist.
///
/// **BUG THIS CATCHES**: Would catch the deck folder being ignored.
#[test]
fn given_deck_folder_when_resolving_working_directory_then_joined_to_workspace() {
    let workspace = Path::new("/home/me/course");
    let mut config = DeckerConfig::default();

    assert_eq!(config.working_directory(workspace), workspace);

    config.deck_folder = Some("slides".to_string());
    assert_eq!(
        config.working_directory(workspace),
        Path::new("/home/me/course/slides")
    );
}

/// **VALUE**: Verifies home and workspace placeholder expansion.
///
/// **WHY THIS MATTERS**: Shared configs use placeholders instead of absolute paths.
///
/// **BUG THIS CATCHES**: Would catch `~` expanding mid-path or workspace placeholders
/// expanding to an empty string when no workspace is open.
#[test]
fn given_placeholders_when_expanding_then_home_and_workspace_substituted() {
    let home = Path::new("/home/me");
    let workspace = Path::new("/work/course");

    assert_eq!(
        expand_placeholders("~/decker", home, None),
        "/home/me/decker"
    );
    assert_eq!(
        expand_placeholders("${HOME}/a/${home}", home, None),
        "/home/me/a//home/me"
    );
    assert_eq!(
        expand_placeholders("${workspaceFolder}/.decker", home, Some(workspace)),
        "/work/course/.decker"
    );
    assert_eq!(
        expand_placeholders("${workspaceRoot}/x", home, None),
        "${workspaceRoot}/x"
    );
    assert_eq!(expand_placeholders("/a/~b", home, None), "/a/~b");
}
