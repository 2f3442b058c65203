// Unit tests for launcher command construction
// Launching real processes is covered in integration_tests/launcher.rs

use crate::process::launcher::{build_command, line_text};
use crate::process::{Invocation, OneShot};

use std::path::Path;

/// **VALUE**: Verifies that the tokio command mirrors the invocation.
///
/// **WHY THIS MATTERS**: decker resolves decks relative to its working directory; running it
/// in the wrong directory builds nothing.
///
/// **BUG THIS CATCHES**: Would catch a dropped `current_dir` or argument list.
#[test]
fn given_invocation_when_building_command_then_sets_program_args_and_dir() {
    // GIVEN: A one-shot invocation
    let invocation = Invocation::one_shot("decker", OneShot::Publish, Path::new("/tmp/decks"));

    // WHEN: Building the command
    let cmd = build_command(&invocation);

    // THEN: Program, args and directory match
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "decker");
    let args: Vec<_> = std_cmd.get_args().collect();
    assert_eq!(args, vec!["publish", "-e"]);
    assert_eq!(std_cmd.get_current_dir(), Some(Path::new("/tmp/decks")));
}

/// **VALUE**: Verifies output lines lose their terminator and keep invalid bytes as replacements.
///
/// **WHY THIS MATTERS**: decker prints file names, which are not always UTF-8.
///
/// **BUG THIS CATCHES**: Would catch a strict UTF-8 decode rejecting the line, or a stray `\r`
/// from Windows line endings reaching the output.
#[test]
fn given_raw_output_line_when_decoded_then_lossy_text_without_terminator() {
    assert_eq!(line_text(b"ready\n"), "ready");
    assert_eq!(line_text(b"ready\r\n"), "ready");
    assert_eq!(line_text(b"no newline"), "no newline");
    assert_eq!(line_text(b"caf\xe9\n"), "caf\u{FFFD}");
}
