//! Verify authentication redirects around protected routes
//!
//! Requires the seeded account test@example.com / password123 to exist on
//! the backend.
//!
//! Run with: cargo run --bin verify-protected-routes

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

    let session = BrowserSession::launch("protected-routes", &config).await?;
    let result = checks::verify_protected_routes(&session, &config).await;
    session.close().await?;

    result.context("protected routes check failed")?;
    info!("Protected routes check passed");
    Ok(())
}
