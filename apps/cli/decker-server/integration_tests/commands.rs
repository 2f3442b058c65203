use decker_server::cli::{Action, Cli, Overrides};
use decker_server::commands::config::describe;
use decker_server::commands::run;
use decker_server::settings::Settings;

use decker_core::config::DeckerConfig;

use std::fs::write;
use std::path::Path;
use std::process::ExitCode;

/// Overrides pointing at temporary directories, storage kept inside the workspace.
fn overrides_for(config_dir: &Path, workspace: &Path) -> Overrides {
    write(
        config_dir.join("config.json"),
        r#"{ "storage_path": "${workspaceFolder}/.decker-server" }"#,
    )
    .unwrap();

    Overrides {
        workspace: Some(workspace.to_path_buf()),
        config_dir: Some(config_dir.to_path_buf()),
        ..Overrides::default()
    }
}

/// **VALUE**: Verifies `config --save` persists the effective configuration.
///
/// **WHY THIS MATTERS**: It is the supported way to turn flags into a config file.
///
/// **BUG THIS CATCHES**: Would catch the save path ignoring `--config-dir`.
#[tokio::test]
async fn given_flags_when_running_config_save_then_written_to_config_dir() {
    // GIVEN: An empty config dir and a port flag
    let config_dir = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let mut overrides = overrides_for(config_dir.path(), workspace.path());
    overrides.port = Some(9200);

    let cli = Cli {
        overrides,
        verbose: false,
        action: Action::Config { save: true },
    };

    // WHEN: Running the config command
    let code = run(cli).await.unwrap();

    // THEN: The saved file carries the flag value
    assert_eq!(code, ExitCode::SUCCESS);
    let saved = DeckerConfig::load(config_dir.path()).unwrap();
    assert_eq!(saved.server.port, 9200);
}

/// **VALUE**: Verifies the config description shows directories and JSON.
#[test]
fn given_settings_when_described_then_lists_directories_and_json() {
    let config_dir = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let settings = Settings::load(&overrides_for(config_dir.path(), workspace.path())).unwrap();

    let text = describe(&settings).unwrap();

    assert!(text.contains(&format!("workspace:   {}", workspace.path().display())));
    assert!(text.contains("\"port\": 8888"));
}
