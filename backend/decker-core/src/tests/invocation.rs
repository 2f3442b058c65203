use crate::Platform;
use crate::process::{Invocation, OneShot, server_args};

use std::path::Path;

/// **VALUE**: Verifies the bit-exact server argument vector.
///
/// **WHY THIS MATTERS**: decker parses these flags positionally; any drift starts decker in
/// the wrong mode or on the wrong port.
///
/// **BUG THIS CATCHES**: Would catch reordered flags or a missing `-e`.
#[test]
fn given_port_when_building_server_args_then_matches_decker_contract() {
    assert_eq!(server_args(8890), vec!["--server", "-p", "8890", "-e"]);
}

/// **VALUE**: Verifies every one-shot argument vector.
///
/// **WHY THIS MATTERS**: These are the contract with the external tool; a plain build has no
/// subcommand, crunch takes no `-e`, pdf runs single-threaded.
///
/// **BUG THIS CATCHES**: Would catch a subcommand gaining or losing a flag.
#[test]
fn given_each_one_shot_when_building_args_then_matches_decker_contract() {
    let expected: [(OneShot, &[&str]); 11] = [
        (OneShot::Build, &["-e"]),
        (OneShot::Clean, &["clean", "-e"]),
        (OneShot::Purge, &["purge", "-e"]),
        (OneShot::Html, &["html", "-e"]),
        (OneShot::Decks, &["decks", "-e"]),
        (OneShot::Pages, &["pages", "-e"]),
        (OneShot::Handouts, &["handouts", "-e"]),
        (OneShot::SearchIndex, &["search-index", "-e"]),
        (OneShot::Crunch, &["crunch"]),
        (OneShot::Publish, &["publish", "-e"]),
        (OneShot::Pdf, &["pdf", "-j1"]),
    ];

    for (command, args) in expected {
        assert_eq!(command.args(), args, "Arguments for {command}");
    }
}

/// **VALUE**: Verifies that names round-trip through `from_name` for every command.
///
/// **WHY THIS MATTERS**: The interactive session dispatches one-shots by name.
///
/// **BUG THIS CATCHES**: Would catch a command missing from `ALL` or a name typo.
#[test]
fn given_all_one_shots_when_looked_up_by_name_then_found() {
    for command in OneShot::ALL {
        assert_eq!(OneShot::from_name(command.name()), Some(command));
    }
    assert_eq!(OneShot::from_name("serve"), None);
}

/// **VALUE**: Verifies that pdf export is rejected on Windows only.
///
/// **WHY THIS MATTERS**: decker's pdf export does not work on Windows.
///
/// **BUG THIS CATCHES**: Would catch other commands being blocked, or pdf allowed on Windows.
#[test]
fn given_platforms_when_checking_support_then_only_pdf_on_windows_is_unsupported() {
    for command in OneShot::ALL {
        assert!(command.is_supported_on(Platform::Unix));
        assert_eq!(
            command.is_supported_on(Platform::Windows),
            command != OneShot::Pdf
        );
    }
}

/// **VALUE**: Verifies that invocations carry program, args, directory and label.
///
/// **WHY THIS MATTERS**: The launcher trusts the invocation completely.
///
/// **BUG THIS CATCHES**: Would catch the configured command being replaced by the default.
#[test]
fn given_custom_command_when_building_invocations_then_uses_it() {
    let dir = Path::new("/work/decks");

    let server = Invocation::server("/opt/decker/bin/decker", 9000, dir);
    assert_eq!(server.program, "/opt/decker/bin/decker");
    assert_eq!(server.working_dir, dir);
    assert_eq!(server.label, "server");
    assert_eq!(
        server.command_line(),
        "/opt/decker/bin/decker --server -p 9000 -e"
    );

    let clean = Invocation::one_shot("decker", OneShot::Clean, dir);
    assert_eq!(clean.label, "clean");
    assert_eq!(clean.command_line(), "decker clean -e");
}
