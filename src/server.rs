//! Target server readiness probe
//!
//! The checks assume the portfolio tracker dev server is already running at
//! the configured base URL. Polling it before launching a browser turns a
//! dead server into a clear startup error instead of a misleading page
//! timeout halfway through a check.

use std::time::Duration;

use tracing::{info, warn};

use crate::browser::CheckError;

/// Wait until the base URL answers any HTTP request
pub async fn wait_until_ready(base_url: &str, timeout: Duration) -> Result<(), CheckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| CheckError::ServerUnavailable(e.to_string()))?;

    let start = std::time::Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < timeout {
        attempts += 1;
        match client.get(base_url).send().await {
            // Any status counts as ready; the checks assert on page content,
            // not on the status of the root route
            Ok(response) => {
                info!(
                    "Target server ready at {} (status {}, attempt {})",
                    base_url,
                    response.status(),
                    attempts
                );
                return Ok(());
            }
            Err(e) => {
                if attempts == 1 {
                    warn!("Target server not answering yet at {}: {}", base_url, e);
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(CheckError::ServerUnavailable(format!(
        "{} did not answer within {}s ({} attempts)",
        base_url,
        timeout.as_secs(),
        attempts
    )))
}
