//! Verify the registration-to-dashboard flow
//!
//! On failure this check saves error_screenshot.png before exiting non-zero,
//! so the broken page state is visible alongside the error.
//!
//! Run with: cargo run --bin verify-signup

use std::time::Duration;

use anyhow::Context;
use tracing::info;

use ui_checks::browser::BrowserSession;
use ui_checks::{checks, server, CheckConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let config = CheckConfig::default();
    server::wait_until_ready(&config.base_url, Duration::from_secs(config.server_wait_secs))
        .await
        .context("target server never became ready")?;

    let session = BrowserSession::launch("signup", &config).await?;
    let result = checks::verify_signup(&session, &config).await;
    session.close().await?;

    result.context("signup check failed")?;
    info!("Signup check passed");
    Ok(())
}
