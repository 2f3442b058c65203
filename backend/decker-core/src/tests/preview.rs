use crate::preview::{document_html_path, server_url};

use std::path::Path;

/// **VALUE**: Verifies markdown documents map to their published HTML path.
///
/// **WHY THIS MATTERS**: The preview and browser URLs point at this path; a wrong path is a
/// 404 in the preview.
///
/// **BUG THIS CATCHES**: Would catch the extension not being swapped or the workspace prefix
/// leaking into the URL.
#[test]
fn given_markdown_in_workspace_when_mapping_then_relative_html_path() {
    let workspace = Path::new("/work/course");

    assert_eq!(
        document_html_path(workspace, Path::new("/work/course/week1/intro-deck.md"), None),
        Some("week1/intro-deck.html".to_string())
    );
    assert_eq!(
        document_html_path(workspace, Path::new("index.md"), None),
        Some("index.html".to_string())
    );
}

/// **VALUE**: Verifies the deck folder is stripped from the path.
///
/// **WHY THIS MATTERS**: The server runs inside the deck folder, so its URLs start there.
///
/// **BUG THIS CATCHES**: Would catch `slides/` appearing twice or not being removed.
#[test]
fn given_deck_folder_when_mapping_then_path_relative_to_deck_folder() {
    let workspace = Path::new("/work/course");

    assert_eq!(
        document_html_path(
            workspace,
            Path::new("/work/course/slides/a/b-deck.md"),
            Some("slides")
        ),
        Some("a/b-deck.html".to_string())
    );
}

/// **VALUE**: Verifies non-markdown and out-of-tree documents have no page.
///
/// **WHY THIS MATTERS**: The server cannot serve them; callers show an error or the root.
///
/// **BUG THIS CATCHES**: Would catch `..` escaping the served directory.
#[test]
fn given_unservable_document_when_mapping_then_none() {
    let workspace = Path::new("/work/course");

    assert_eq!(
        document_html_path(workspace, Path::new("notes.txt"), None),
        None
    );
    assert_eq!(
        document_html_path(workspace, Path::new("/elsewhere/deck.md"), None),
        None
    );
    assert_eq!(
        document_html_path(workspace, Path::new("../other/deck.md"), None),
        None
    );
    assert_eq!(
        document_html_path(workspace, Path::new("/work/course/top.md"), Some("slides")),
        None
    );
}

/// **VALUE**: Verifies server URLs with and without a path.
///
/// **WHY THIS MATTERS**: Deck names frequently contain spaces.
///
/// **BUG THIS CATCHES**: Would catch unencoded spaces or a missing trailing slash.
#[test]
fn given_port_and_path_when_building_url_then_localhost_with_encoded_path() {
    assert_eq!(server_url(8888, None), "http://localhost:8888/");
    assert_eq!(
        server_url(8890, Some("week 1/intro-deck.html")),
        "http://localhost:8890/week%201/intro-deck.html"
    );
}

/// **VALUE**: Verifies the same document maps differently with and without a deck folder.
///
/// **WHY THIS MATTERS**: Switching the deck folder setting changes where the server runs.
///
/// **BUG THIS CATCHES**: Would catch the deck folder being applied to relative documents
/// only, or not at all.
#[test]
fn given_relative_document_when_deck_folder_toggled_then_path_follows_served_root() {
    let workspace = Path::new("/work/course");
    let document = Path::new("notes/lecture1.md");

    assert_eq!(
        document_html_path(workspace, document, Some("notes")),
        Some("lecture1.html".to_string())
    );
    assert_eq!(
        document_html_path(workspace, document, None),
        Some("notes/lecture1.html".to_string())
    );
}
