//! Waiting for a freshly started decker server to accept HTTP requests.

use crate::error::spawn::SpawnError;

use common::ErrorLocation;

use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, info, trace};
use reqwest::Client;
use tokio::time::sleep as TokioSleep;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether anything answers HTTP at `base_url`.
///
/// Any response counts, including 404: the server is listening even if
/// the root has no index page.
pub async fn is_serving(client: &Client, base_url: &str) -> bool {
    match client.get(base_url).timeout(REQUEST_TIMEOUT).send().await {
        Ok(resp) => {
            trace!("{base_url} answered with {}", resp.status());
            true
        }
        Err(e) => {
            trace!("{base_url} not answering yet: {e}");
            false
        }
    }
}

/// Poll `base_url` with exponential backoff until it answers.
///
/// # Errors
///
/// Returns [`SpawnError::Timeout`] when nothing answers within `max_elapsed`.
pub async fn wait_until_serving(base_url: &str, max_elapsed: Duration) -> Result<(), SpawnError> {
    let client = Client::new();
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_millis(100),
        max_elapsed_time: Some(max_elapsed),
        ..Default::default()
    };

    debug!("Waiting for decker server at {base_url}");

    loop {
        if is_serving(&client, base_url).await {
            info!("Decker server is answering at {base_url}");
            return Ok(());
        }

        match backoff.next_backoff() {
            Some(duration) => {
                trace!("Server not ready, retrying after {duration:?}");
                TokioSleep(duration).await;
            }
            None => {
                return Err(SpawnError::Timeout {
                    message: format!(
                        "Decker server at {base_url} did not answer within {max_elapsed:?}"
                    ),
                    location: ErrorLocation::here(),
                });
            }
        }
    }
}
