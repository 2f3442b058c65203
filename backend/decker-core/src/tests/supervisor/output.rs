use crate::supervisor::STDERR_NOTICE_MESSAGE;
use crate::supervisor::output::ServerOutput;
use crate::ui::{Notice, Notifier, OutputSink, StatusLine};
use crate::view::Page;

use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    lines: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn show_page(&self, _page: &Page) {}

    fn status_changed(&self, _status: StatusLine) {}
}

impl OutputSink for Recorder {
    fn stdout(&self, source: &str, line: &str) {
        self.lines.lock().unwrap().push(format!("out {source}: {line}"));
    }

    fn stderr(&self, source: &str, line: &str) {
        self.lines.lock().unwrap().push(format!("err {source}: {line}"));
    }

    fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(format!("log {line}"));
    }
}

/// **VALUE**: Verifies that server stderr is relayed and raises exactly one error notice.
///
/// **WHY THIS MATTERS**: decker can print many stderr lines per error; one notice per line
/// would flood the user.
///
/// **BUG THIS CATCHES**: Would catch the once-only guard being lost or stderr not relayed.
#[test]
fn given_server_output_when_stderr_repeats_then_one_notice_and_all_lines_relayed() {
    // GIVEN: A server output wrapper around a recorder
    let recorder = Arc::new(Recorder::default());
    let output = ServerOutput::new(recorder.clone(), recorder.clone());

    // WHEN: Writing stdout once and stderr twice
    output.stdout("server", "ready");
    output.stderr("server", "boom");
    output.stderr("server", "boom again");

    // THEN: All lines relayed, one error notice
    let lines = recorder.lines.lock().unwrap().clone();
    assert_eq!(
        lines,
        vec![
            "out server: ready",
            "err server: boom",
            "err server: boom again"
        ]
    );
    let notices = recorder.notices.lock().unwrap().clone();
    assert_eq!(notices, vec![Notice::error(STDERR_NOTICE_MESSAGE)]);
}
