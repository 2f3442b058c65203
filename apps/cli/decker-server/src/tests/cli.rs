use crate::cli::{Action, Cli, Overrides};

use decker_core::config::DeckerConfig;
use decker_core::error::config::ConfigError;
use decker_core::process::OneShot;

use std::path::PathBuf;

use clap::Parser;

/// **VALUE**: Verifies global flags are accepted after the subcommand.
///
/// **WHY THIS MATTERS**: `decker-server serve --port 9000` is the natural way to type it.
///
/// **BUG THIS CATCHES**: Would catch `global = true` being dropped from a flag.
#[test]
fn given_flags_after_subcommand_when_parsing_then_overrides_filled() {
    let cli = Cli::try_parse_from([
        "decker-server",
        "serve",
        "--port",
        "9000",
        "--command",
        "/opt/decker/bin/decker",
        "--deck-folder",
        "slides",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.action, Action::Serve);
    assert_eq!(cli.overrides.port, Some(9000));
    assert_eq!(
        cli.overrides.executable.as_deref(),
        Some("/opt/decker/bin/decker")
    );
    assert_eq!(cli.overrides.deck_folder.as_deref(), Some("slides"));
    assert!(cli.verbose);
}

/// **VALUE**: Verifies documents are optional for open and preview.
#[test]
fn given_open_with_and_without_document_when_parsing_then_optional_path() {
    let with = Cli::try_parse_from(["decker-server", "open", "week1/intro-deck.md"]).unwrap();
    let without = Cli::try_parse_from(["decker-server", "preview"]).unwrap();

    assert_eq!(
        with.action,
        Action::Open {
            document: Some(PathBuf::from("week1/intro-deck.md"))
        }
    );
    assert_eq!(without.action, Action::Preview { document: None });
}

/// **VALUE**: Verifies one-shot subcommands map onto decker commands, including the
/// hyphenated search index.
///
/// **WHY THIS MATTERS**: The mapping decides which decker command runs.
///
/// **BUG THIS CATCHES**: Would catch `search-index` being exposed as `searchindex`.
#[test]
fn given_one_shot_subcommands_when_parsing_then_map_to_decker_commands() {
    for command in OneShot::ALL {
        let cli = Cli::try_parse_from(["decker-server", command.name()]).unwrap();
        assert_eq!(cli.action.one_shot(), Some(command));
    }

    let serve = Cli::try_parse_from(["decker-server", "serve"]).unwrap();
    assert_eq!(serve.action.one_shot(), None);
}

/// **VALUE**: Verifies overrides replace config values and are validated.
///
/// **WHY THIS MATTERS**: A flag must beat the config file, and `--port 0` must not slip
/// through.
///
/// **BUG THIS CATCHES**: Would catch overrides skipping validation.
#[test]
fn given_overrides_when_applied_then_config_updated_and_validated() {
    let mut config = DeckerConfig::default();
    let overrides = Overrides {
        executable: Some("decker-dev".to_string()),
        port: Some(9100),
        deck_folder: Some("slides".to_string()),
        ..Overrides::default()
    };

    overrides.apply(&mut config).unwrap();

    assert_eq!(config.executable.command, "decker-dev");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.deck_folder.as_deref(), Some("slides"));

    let zero_port = Overrides {
        port: Some(0),
        ..Overrides::default()
    };
    assert!(matches!(
        zero_port.apply(&mut config),
        Err(ConfigError::ValidationError { .. })
    ));
}
