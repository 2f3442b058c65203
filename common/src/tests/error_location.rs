use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::here()` records the call site, not the constructor.
///
/// **WHY THIS MATTERS**: Every error in the workspace renders its location. If `here()` loses
/// `#[track_caller]`, all errors would point at `error_location.rs` inside the common crate
/// instead of the supervisor code that failed.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[track_caller]` from `here()`.
#[test]
fn given_here_called_when_capturing_then_points_at_this_test_file() {
    // GIVEN / WHEN: Capturing the location from this test
    let location = ErrorLocation::here();

    // THEN: The file is the test module, not the crate source
    assert!(
        location.file.contains("tests"),
        "Should capture the caller file, got {}",
        location.file
    );
    assert!(location.line > 0, "Should capture a line number");
    assert!(location.column > 0, "Should capture a column number");
}

/// **VALUE**: Verifies the "[file:line:column]" display format.
///
/// **WHY THIS MATTERS**: Error messages end with the location in brackets; log readers and
/// tests grep for it.
///
/// **BUG THIS CATCHES**: Would catch format changes such as dropped brackets or colons.
#[test]
#[track_caller]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A location from the current caller
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting it
    let formatted = location.to_string();

    // THEN: Brackets wrap file, line and column separated by two colons
    assert!(formatted.starts_with('['));
    assert!(formatted.ends_with(']'));
    assert!(formatted.contains(&location.line.to_string()));
    assert_eq!(formatted.matches(':').count(), 2);
}

/// **VALUE**: Verifies that consecutive call sites produce consecutive line numbers.
///
/// **WHY THIS MATTERS**: Distinguishing two failure points in the same function relies on
/// accurate line capture.
///
/// **BUG THIS CATCHES**: Would catch location propagation breaking through helper functions.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper that captures its caller
    #[track_caller]
    fn capture() -> ErrorLocation {
        ErrorLocation::here()
    }

    // WHEN: Capturing from two adjacent lines
    let first = capture();
    let second = capture();

    // THEN: Same file, sequential lines
    assert_eq!(first.file, second.file);
    assert_eq!(first.line + 1, second.line);
}

/// **VALUE**: Verifies that `file_name()` strips directories on both separator styles.
///
/// **WHY THIS MATTERS**: The console front end prints short locations for notices.
///
/// **BUG THIS CATCHES**: Would catch Windows-style paths leaking directories.
#[test]
fn given_paths_with_directories_when_file_name_called_then_returns_last_component() {
    // GIVEN: Locations with unix and windows separators
    let unix = ErrorLocation {
        file: "backend/decker-core/src/port/mod.rs",
        line: 1,
        column: 1,
    };
    let windows = ErrorLocation {
        file: "backend\\decker-core\\src\\port\\probe.rs",
        line: 1,
        column: 1,
    };

    // WHEN / THEN: Only the file name remains
    assert_eq!(unix.file_name(), "mod.rs");
    assert_eq!(windows.file_name(), "probe.rs");
}
