//! Portfolio Tracker UI Checks
//!
//! Scripted headless-browser verification of a locally running portfolio
//! tracker: login page rendering, authentication redirects around protected
//! routes, and the registration flow. Each check is a standalone binary in
//! `src/bin/` that drives one browser session and saves screenshots.

pub mod browser;
pub mod checks;
pub mod server;

use std::path::{Path, PathBuf};

/// Configuration shared by all check binaries
///
/// The values are fixed constants of the checks themselves; there are no CLI
/// flags, environment variables, or config files.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    /// Base URL of the web application under test
    pub base_url: String,
    /// Run the browser in headless mode
    pub headless: bool,
    /// Path to Chrome/Chromium executable (auto-detected when None)
    pub chrome_path: Option<String>,
    /// Viewport width
    pub window_width: u32,
    /// Viewport height
    pub window_height: u32,
    /// Directory screenshots are written to
    pub artifact_dir: PathBuf,
    /// How long to wait for the target server to answer before giving up
    pub server_wait_secs: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            headless: true,
            chrome_path: None,
            window_width: 1280,
            window_height: 720,
            artifact_dir: PathBuf::from("."),
            server_wait_secs: 30,
        }
    }
}

impl CheckConfig {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set Chrome path
    pub fn chrome_path(mut self, path: Option<String>) -> Self {
        self.chrome_path = path;
        self
    }

    /// Set the artifact directory
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Full URL for a route path like `/login`
    pub fn route(&self, path: &str) -> String {
        match url::Url::parse(&self.base_url).and_then(|u| u.join(path)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!("{}{}", self.base_url.trim_end_matches('/'), path),
        }
    }

    /// Path a named screenshot artifact is written to
    pub fn artifact(&self, name: impl AsRef<Path>) -> PathBuf {
        self.artifact_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_local_dev_server() {
        let config = CheckConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.headless);
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn test_route_joining() {
        let config = CheckConfig::default();
        assert_eq!(config.route("/login"), "http://localhost:3000/login");
        assert_eq!(config.route("/dashboard"), "http://localhost:3000/dashboard");
    }

    #[test]
    fn test_route_joining_with_trailing_slash() {
        let config = CheckConfig {
            base_url: "http://localhost:3000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.route("/register"), "http://localhost:3000/register");
    }

    #[test]
    fn test_artifact_path() {
        let config = CheckConfig::default().artifact_dir("shots");
        assert_eq!(
            config.artifact("verification.png"),
            PathBuf::from("shots/verification.png")
        );
    }
}
