//! Registration flow check
//!
//! Registers a fresh account through `/register` and verifies the app drops
//! the new user straight onto the dashboard. This is the one script with an
//! explicit failure path: any error is logged, a diagnostic screenshot is
//! captured, and the error is re-raised so the process still exits non-zero.

use std::time::Duration;

use tracing::{error, info, warn};

use super::unique_email;
use crate::browser::{BrowserSession, CheckError, Locator, UrlPattern};
use crate::CheckConfig;

const REGISTER_HEADING: &str = "Create an account";
const DASHBOARD_HEADING: &str = "Portfolios";

const SIGNUP_FIRST_NAME: &str = "Test";
const SIGNUP_LAST_NAME: &str = "User";
const SIGNUP_PASSWORD: &str = "Password123!";

/// Registration creates the account server-side before redirecting
const SIGNUP_REDIRECT_TIMEOUT: Duration = Duration::from_secs(20);

pub async fn verify_signup(
    session: &BrowserSession,
    config: &CheckConfig,
) -> Result<(), CheckError> {
    match run_signup(session, config).await {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("Signup check failed: {}", err);
            let shot = config.artifact("error_screenshot.png");
            match session.screenshot(&shot).await {
                Ok(()) => info!("Error screenshot saved to {}", shot.display()),
                Err(shot_err) => warn!("Could not save error screenshot: {}", shot_err),
            }
            Err(err)
        }
    }
}

async fn run_signup(session: &BrowserSession, config: &CheckConfig) -> Result<(), CheckError> {
    session.navigate(&config.route("/register")).await?;
    session
        .expect_visible(&Locator::heading(REGISTER_HEADING))
        .await?;

    let email = unique_email();
    info!("Registering new account {}", email);

    session.fill(&Locator::label("First Name"), SIGNUP_FIRST_NAME).await?;
    session.fill(&Locator::label("Last Name"), SIGNUP_LAST_NAME).await?;
    session.fill(&Locator::label("Email Address"), &email).await?;
    session.fill(&Locator::label("Password"), SIGNUP_PASSWORD).await?;

    session.click(&Locator::button("Create Account")).await?;

    // A duplicate email (or any validation failure) never reaches the
    // dashboard, so it surfaces here as an expectation timeout
    session
        .expect_url_within(&UrlPattern::contains("dashboard"), SIGNUP_REDIRECT_TIMEOUT)
        .await?;
    session
        .expect_visible(&Locator::heading(DASHBOARD_HEADING))
        .await?;

    session
        .screenshot(&config.artifact("signup_dashboard.png"))
        .await?;

    info!("New account landed on the dashboard");
    Ok(())
}
