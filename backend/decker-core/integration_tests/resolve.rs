use decker_core::resolve::{ExecutableResolver, PathResolver, search_path_entries, split_search_path};

use std::ffi::OsString;
use std::path::Path;

use serial_test::serial;

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// **VALUE**: Verifies an executable on the search path is found.
///
/// **WHY THIS MATTERS**: Every request is gated on this check.
///
/// **BUG THIS CATCHES**: Would catch the explicit search path being ignored.
#[cfg(unix)]
#[test]
fn given_executable_in_search_path_when_resolving_then_installed() {
    // GIVEN: A bin directory holding an executable `decker`
    let dir = tempfile::tempdir().unwrap();
    make_executable(&dir.path().join("decker"));
    let resolver = PathResolver::with_search_path(dir.path().as_os_str());

    // WHEN / THEN: It resolves to that file
    assert!(resolver.is_installed("decker"));
    assert_eq!(resolver.locate("decker"), Some(dir.path().join("decker")));
}

/// **VALUE**: Verifies a missing executable is reported as not installed.
///
/// **WHY THIS MATTERS**: Not being installed is a normal outcome that leads to install help.
///
/// **BUG THIS CATCHES**: Would catch a lookup error being turned into a panic.
#[test]
fn given_empty_search_path_when_resolving_then_not_installed() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = PathResolver::with_search_path(dir.path().as_os_str());

    assert!(!resolver.is_installed("decker"));
}

/// **VALUE**: Verifies install help lists the process PATH entries in order.
///
/// **WHY THIS MATTERS**: Users compare this list with where they installed decker.
///
/// **BUG THIS CATCHES**: Would catch entries being reordered or empty entries kept.
#[test]
#[serial]
fn given_path_variable_when_listing_entries_then_split_in_order() {
    // GIVEN: A known PATH
    let original = std::env::var_os("PATH");
    let joined = std::env::join_paths(["/opt/decker/bin", "/usr/bin"]).unwrap();
    // SAFETY: serialised with every other test touching PATH
    unsafe { std::env::set_var("PATH", &joined) };

    // WHEN: Listing entries
    let entries = search_path_entries();

    // THEN: Both entries, in order
    match original {
        // SAFETY: see above
        Some(value) => unsafe { std::env::set_var("PATH", value) },
        None => unsafe { std::env::remove_var("PATH") },
    }
    assert_eq!(entries, vec!["/opt/decker/bin", "/usr/bin"]);
}

#[cfg(unix)]
#[test]
fn given_empty_entries_when_splitting_then_dropped() {
    let raw = OsString::from("/a::/b:");
    assert_eq!(split_search_path(&raw), vec!["/a", "/b"]);
}
