use decker_core::config::{DeckerConfig, ProbeKind, storage_directory};
use decker_core::error::config::ConfigError;

/// **VALUE**: Verifies a missing config file yields defaults without creating anything.
///
/// **WHY THIS MATTERS**: First run has no config file.
///
/// **BUG THIS CATCHES**: Would catch load failing on a fresh machine.
#[test]
fn given_no_file_when_loading_then_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = DeckerConfig::load(dir.path()).unwrap();

    assert_eq!(config, DeckerConfig::default());
    assert!(!dir.path().join("config.json").exists());
}

/// **VALUE**: Verifies saved config loads back unchanged and leaves no temp file.
///
/// **WHY THIS MATTERS**: Saving uses temp file plus rename; a leftover temp file means the
/// rename did not happen.
///
/// **BUG THIS CATCHES**: Would catch fields missing from serialization.
#[test]
fn given_custom_config_when_saved_then_loads_back() {
    // GIVEN: A non-default config
    let dir = tempfile::tempdir().unwrap();
    let mut config = DeckerConfig::default();
    config.executable.command = "/opt/decker/bin/decker".to_string();
    config.server.port = 9000;
    config.server.autostart = true;
    config.server.probe = ProbeKind::SocketTable;
    config.deck_folder = Some("slides".to_string());

    // WHEN: Saving and loading
    config.save(dir.path()).unwrap();
    let loaded = DeckerConfig::load(dir.path()).unwrap();

    // THEN: Identical, no temp file left
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

/// **VALUE**: Verifies corrupt JSON is a parse error naming the file.
///
/// **WHY THIS MATTERS**: Silently falling back to defaults would hide the user's mistake.
///
/// **BUG THIS CATCHES**: Would catch parse failures being swallowed.
#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let result = DeckerConfig::load(dir.path());

    match result {
        Err(ConfigError::ParseError { path, .. }) => {
            assert_eq!(path, dir.path().join("config.json"));
        }
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

/// **VALUE**: Verifies invalid values on disk are rejected on load.
#[test]
fn given_port_zero_on_disk_when_loading_then_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "server": { "port": 0 } }"#,
    )
    .unwrap();

    assert!(matches!(
        DeckerConfig::load(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// **VALUE**: Verifies a storage override with a workspace placeholder is expanded.
///
/// **WHY THIS MATTERS**: Per-project logs are configured this way.
///
/// **BUG THIS CATCHES**: Would catch the override being returned unexpanded.
#[test]
fn given_workspace_placeholder_when_resolving_storage_then_inside_workspace() {
    let workspace = tempfile::tempdir().unwrap();
    let mut config = DeckerConfig::default();
    config.storage_path = Some("${workspaceFolder}/.decker-server".to_string());

    let dir = storage_directory(&config, Some(workspace.path())).unwrap();

    assert_eq!(dir, workspace.path().join(".decker-server"));
}
