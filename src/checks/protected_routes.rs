//! Authentication redirect checks
//!
//! Walks the router's guard logic from both sides: unauthenticated visits to
//! a protected route must land on `/login`, and once logged in, `/login`
//! must bounce straight back to `/dashboard` without re-submitting
//! credentials.

use std::time::Duration;

use tracing::info;

use crate::browser::{BrowserSession, CheckError, Locator, UrlPattern};
use crate::CheckConfig;

/// Pre-seeded backend account; provisioning it is outside this script's scope
const SEEDED_EMAIL: &str = "test@example.com";
const SEEDED_PASSWORD: &str = "password123";

/// Login submission can hit the backend, so it gets longer than the default
const LOGIN_REDIRECT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn verify_protected_routes(
    session: &BrowserSession,
    config: &CheckConfig,
) -> Result<(), CheckError> {
    // 1. Unauthenticated access to a private route
    info!("Checking unauthenticated access to private route...");
    session.navigate(&config.route("/dashboard")).await?;
    session
        .expect_url(&UrlPattern::exact(config.route("/login")))
        .await?;
    session
        .screenshot(&config.artifact("unauthenticated_redirect.png"))
        .await?;
    info!("...redirected to /login as expected");

    // 2. Log in with the seeded account
    info!("Logging in as {}...", SEEDED_EMAIL);
    session.navigate(&config.route("/login")).await?;
    session.fill(&Locator::id("email"), SEEDED_EMAIL).await?;
    session.fill(&Locator::id("password"), SEEDED_PASSWORD).await?;
    session.click(&Locator::button("Sign In")).await?;
    session
        .expect_url_within(
            &UrlPattern::exact(config.route("/dashboard")),
            LOGIN_REDIRECT_TIMEOUT,
        )
        .await?;
    info!("...login successful, redirected to /dashboard");

    // 3. Authenticated access to a public route redirects away
    info!("Checking authenticated access to public route...");
    session.navigate(&config.route("/login")).await?;
    session
        .expect_url(&UrlPattern::exact(config.route("/dashboard")))
        .await?;
    session
        .screenshot(&config.artifact("authenticated_redirect.png"))
        .await?;
    info!("...redirected to /dashboard from /login as expected");

    // 4. Authenticated access to another private route sticks
    info!("Checking authenticated access to another private route...");
    session.navigate(&config.route("/profile")).await?;
    session
        .expect_url(&UrlPattern::exact(config.route("/profile")))
        .await?;
    session
        .screenshot(&config.artifact("authenticated_profile_access.png"))
        .await?;
    info!("...successfully accessed /profile");

    Ok(())
}
