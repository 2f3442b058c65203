use crate::view::{Page, escape_html};

/// **VALUE**: Verifies the preview page embeds the deck URL in a frame.
///
/// **WHY THIS MATTERS**: The preview page is nothing but that frame.
///
/// **BUG THIS CATCHES**: Would catch the frame pointing at the wrong port or path.
#[test]
fn given_preview_page_when_rendered_then_iframe_points_at_server() {
    let page = Page::preview(8889, "intro-deck.html");

    let html = page.render();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<iframe src=\"http://localhost:8889/intro-deck.html\"></iframe>"));
    assert!(html.contains("<title>Decker Preview</title>"));
    assert_eq!(page.file_name(), "preview.html");
}

/// **VALUE**: Verifies error messages are escaped.
///
/// **WHY THIS MATTERS**: Messages can contain file names chosen by anyone.
///
/// **BUG THIS CATCHES**: Would catch raw markup being injected into the page.
#[test]
fn given_error_with_markup_when_rendered_then_escaped() {
    let html = Page::error("<b>bad</b> & \"worse\"").render();

    assert!(html.contains("<h1>&lt;b&gt;bad&lt;/b&gt; &amp; &quot;worse&quot;</h1>"));
    assert!(!html.contains("<b>bad</b>"));
}

/// **VALUE**: Verifies install help lists the command, download link and every PATH entry.
///
/// **WHY THIS MATTERS**: Users need to see where the executable was looked for.
///
/// **BUG THIS CATCHES**: Would catch entries being joined into one item or dropped.
#[test]
fn given_install_help_when_rendered_then_lists_search_path() {
    let page = Page::InstallHelp {
        command: "decker".to_string(),
        search_path: vec!["/usr/bin".to_string(), "/opt/bin".to_string()],
        download_url: "https://example.org/decker/".to_string(),
    };

    let html = page.render();

    assert!(html.contains("<code>decker</code>"));
    assert!(html.contains("<a href=\"https://example.org/decker/\">"));
    assert!(html.contains("<li><code>/usr/bin</code></li>"));
    assert!(html.contains("<li><code>/opt/bin</code></li>"));
    assert_eq!(page.title(), "Install Decker");
}

#[test]
fn given_quote_characters_when_escaping_then_entities() {
    assert_eq!(escape_html("it's"), "it&#39;s");
}
