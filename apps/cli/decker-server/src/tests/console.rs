use crate::console::ConsoleFrontend;

use decker_core::ui::Notifier;
use decker_core::view::Page;

/// **VALUE**: Verifies pages are written as HTML files and remembered.
///
/// **WHY THIS MATTERS**: The preview command opens the written file in a browser.
///
/// **BUG THIS CATCHES**: Would catch the pages directory not being created.
#[test]
fn given_page_when_shown_then_written_to_pages_dir() {
    // GIVEN: A frontend writing into a directory that does not exist yet
    let dir = tempfile::tempdir().unwrap();
    let frontend = ConsoleFrontend::new(dir.path().join("pages"));
    let page = Page::error("No active document.");

    // WHEN: Showing the page
    frontend.show_page(&page);

    // THEN: error.html holds the rendered page
    let path = dir.path().join("pages").join("error.html");
    assert_eq!(frontend.last_page(), Some(path.clone()));
    assert_eq!(frontend.page_path(&page), path);
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("No active document."));
}
