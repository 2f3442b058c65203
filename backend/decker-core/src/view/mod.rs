//! Static HTML pages shown to the user.
//!
//! Each [`Page`] is a typed payload; [`Page::render`] turns it into a
//! complete HTML document. Nothing here knows about processes.

mod escape;

pub use escape::escape_html;

use crate::DECKER_DOWNLOAD_URL;
use crate::preview::server_url;
use crate::resolve::search_path_entries;

use std::fmt::Write as _;

const PAGE_STYLE: &str = "html, body { width: 100%; height: 100%; margin: 0; padding: 0; } \
body { font-family: sans-serif; } \
iframe { width: 100%; height: 100%; border: none; } \
main { padding: 1em 2em; }";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Embeds the served deck in a full-size frame.
    Preview { url: String },
    Error { message: String },
    /// Shown when the decker executable cannot be found.
    InstallHelp {
        command: String,
        search_path: Vec<String>,
        download_url: String,
    },
}

impl Page {
    pub fn preview(port: u16, html_path: &str) -> Self {
        Page::Preview {
            url: server_url(port, Some(html_path)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Page::Error {
            message: message.into(),
        }
    }

    /// Installation help for `command` using the current `PATH`.
    pub fn install_help(command: impl Into<String>) -> Self {
        Page::InstallHelp {
            command: command.into(),
            search_path: search_path_entries(),
            download_url: DECKER_DOWNLOAD_URL.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Preview { .. } => "Decker Preview",
            Page::Error { .. } => "Error",
            Page::InstallHelp { .. } => "Install Decker",
        }
    }

    /// File name used when a page is written to disk.
    pub fn file_name(&self) -> &'static str {
        match self {
            Page::Preview { .. } => "preview.html",
            Page::Error { .. } => "error.html",
            Page::InstallHelp { .. } => "install.html",
        }
    }

    pub fn render(&self) -> String {
        let body = match self {
            Page::Preview { url } => {
                format!("<iframe src=\"{}\"></iframe>", escape_html(url))
            }
            Page::Error { message } => {
                format!("<main><h1>{}</h1></main>", escape_html(message))
            }
            Page::InstallHelp {
                command,
                search_path,
                download_url,
            } => render_install_help(command, search_path, download_url),
        };

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <style>{PAGE_STYLE}</style>\n\
             <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
            title = self.title(),
        )
    }
}

fn render_install_help(command: &str, search_path: &[String], download_url: &str) -> String {
    let mut html = String::new();
    html.push_str("<main>\n<h1>Install decker</h1>\n");
    let _ = writeln!(
        html,
        "<p>We could not find <code>{}</code> on your system.</p>",
        escape_html(command)
    );
    let _ = writeln!(
        html,
        "<p><a href=\"{0}\">Please download decker here</a></p>",
        escape_html(download_url)
    );
    html.push_str("<p>The following directories were searched:</p>\n<ul>\n");
    for entry in search_path {
        let _ = writeln!(html, "<li><code>{}</code></li>", escape_html(entry));
    }
    html.push_str("</ul>\n</main>");
    html
}
