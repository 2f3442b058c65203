use decker_core::error::spawn::SpawnError;
use decker_core::readiness::{is_serving, wait_until_serving};

use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies any HTTP answer counts as serving, including 404.
///
/// **WHY THIS MATTERS**: A deck folder without index page answers 404 at the root but is up.
///
/// **BUG THIS CATCHES**: Would catch readiness waiting for a 200 that never comes.
#[tokio::test]
async fn given_server_answering_404_when_checking_then_serving() {
    // GIVEN: A server that answers every request with 404
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // WHEN / THEN: It counts as serving
    assert!(is_serving(&Client::new(), &server.uri()).await);
    assert!(
        wait_until_serving(&server.uri(), Duration::from_secs(2))
            .await
            .is_ok()
    );
}

/// **VALUE**: Verifies waiting gives up with a timeout error when nothing listens.
///
/// **WHY THIS MATTERS**: A decker server that never comes up must not hang the preview.
///
/// **BUG THIS CATCHES**: Would catch an unbounded wait loop.
#[tokio::test]
async fn given_nothing_listening_when_waiting_then_timeout_error() {
    // GIVEN: A port that was just released
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port())
    };

    // WHEN: Waiting briefly
    let result = wait_until_serving(&url, Duration::from_millis(300)).await;

    // THEN: Timeout
    assert!(matches!(result, Err(SpawnError::Timeout { .. })));
}
