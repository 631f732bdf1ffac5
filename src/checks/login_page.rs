//! Login page rendering check
//!
//! Confirms `/login` loads and shows its main card before capturing the
//! reference screenshot.

use tracing::info;

use crate::browser::{BrowserSession, CheckError, Locator};
use crate::CheckConfig;

const LOGIN_HEADING: &str = "Welcome Back";

pub async fn verify_login_page(
    session: &BrowserSession,
    config: &CheckConfig,
) -> Result<(), CheckError> {
    session.navigate(&config.route("/login")).await?;

    // The heading is the last thing the card renders; once it is visible the
    // page is worth screenshotting
    session.expect_visible(&Locator::heading(LOGIN_HEADING)).await?;

    session.screenshot(&config.artifact("verification.png")).await?;

    info!("Login page rendered with \"{}\" heading", LOGIN_HEADING);
    Ok(())
}
