//! Verify the login page renders
//!
//! Run with: cargo run --bin verify-login-page

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

    let session = BrowserSession::launch("login-page", &config).await?;
    let result = checks::verify_login_page(&session, &config).await;
    session.close().await?;

    result.context("login page check failed")?;
    info!("Login page check passed");
    Ok(())
}
