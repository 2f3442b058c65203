use decker_server::cli::Overrides;
use decker_server::error::AppError;
use decker_server::settings::Settings;

use std::fs::write;

/// **VALUE**: Verifies config file values, flags and directories combine into one settings
/// value.
///
/// **WHY THIS MATTERS**: Every command starts from these settings.
///
/// **BUG THIS CATCHES**: Would catch flags losing against the file, or the storage directory
/// not being created.
#[test]
fn given_config_file_and_flags_when_loading_then_flags_win_and_storage_created() {
    // GIVEN: A config file with port 9000 and a workspace-relative storage path
    let config_dir = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    write(
        config_dir.path().join("config.json"),
        r#"{
            "server": { "port": 9000, "autostart": true },
            "storage_path": "${workspaceFolder}/.decker-server"
        }"#,
    )
    .unwrap();

    let overrides = Overrides {
        port: Some(9100),
        workspace: Some(workspace.path().to_path_buf()),
        config_dir: Some(config_dir.path().to_path_buf()),
        ..Overrides::default()
    };

    // WHEN: Loading settings
    let settings = Settings::load(&overrides).unwrap();

    // THEN: Flag port wins, file values kept, storage created inside the workspace
    assert_eq!(settings.config.server.port, 9100);
    assert!(settings.config.server.autostart);
    assert_eq!(settings.workspace, workspace.path());
    assert_eq!(
        settings.storage_dir,
        workspace.path().join(".decker-server")
    );
    assert!(settings.storage_dir.is_dir());
    assert_eq!(
        settings.pages_dir(),
        workspace.path().join(".decker-server").join("pages")
    );
}

/// **VALUE**: Verifies a corrupt config file stops the run with a core error.
///
/// **WHY THIS MATTERS**: Running with defaults would ignore the user's settings silently.
///
/// **BUG THIS CATCHES**: Would catch load errors being swallowed by the front end.
#[test]
fn given_corrupt_config_when_loading_then_core_error() {
    let config_dir = tempfile::tempdir().unwrap();
    write(config_dir.path().join("config.json"), "{ nope").unwrap();

    let overrides = Overrides {
        config_dir: Some(config_dir.path().to_path_buf()),
        workspace: Some(config_dir.path().to_path_buf()),
        ..Overrides::default()
    };

    let result = Settings::load(&overrides);

    match result {
        Err(AppError::Core { message, .. }) => assert!(message.contains("Config Parse Error")),
        other => panic!("Expected a core error, got {other:?}"),
    }
}
