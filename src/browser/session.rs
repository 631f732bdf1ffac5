//! Browser session management
//!
//! Handles launching and controlling one headless Chromium instance per
//! check. Every DOM interaction goes through injected JavaScript so the
//! locator uniqueness rule and visibility checks run inside the page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::locator::{js_quote, Locator};
use super::CheckError;
use crate::CheckConfig;

/// Default wait for a single expectation
const DEFAULT_EXPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How often expectations re-check the page
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on a single page load
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single JavaScript evaluation
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Find Chrome/Chromium executable on the system
fn find_chrome() -> Option<std::path::PathBuf> {
    let candidates: Vec<std::path::PathBuf> = if cfg!(target_os = "windows") {
        let mut paths = vec![
            std::path::PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            std::path::PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            paths.push(std::path::PathBuf::from(format!(
                r"{}\Google\Chrome\Application\chrome.exe",
                local
            )));
        }
        paths
    } else if cfg!(target_os = "macos") {
        vec![std::path::PathBuf::from(
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        )]
    } else {
        vec![
            std::path::PathBuf::from("/usr/bin/chromium"),
            std::path::PathBuf::from("/usr/bin/chromium-browser"),
            std::path::PathBuf::from("/usr/bin/google-chrome"),
            std::path::PathBuf::from("/usr/bin/google-chrome-stable"),
        ]
    };

    candidates.into_iter().find(|p| p.exists())
}

/// Expected shape of the current page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Full URL equality, ignoring a trailing slash
    Exact(String),
    /// URL contains the given fragment
    Contains(String),
}

impl UrlPattern {
    pub fn exact(url: impl Into<String>) -> Self {
        Self::Exact(url.into())
    }

    pub fn contains(fragment: impl Into<String>) -> Self {
        Self::Contains(fragment.into())
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlPattern::Exact(expected) => {
                url.trim_end_matches('/') == expected.trim_end_matches('/')
            }
            UrlPattern::Contains(fragment) => url.contains(fragment),
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlPattern::Exact(expected) => write!(f, "url == {expected}"),
            UrlPattern::Contains(fragment) => write!(f, "url contains \"{fragment}\""),
        }
    }
}

/// A browser session for one verification script
pub struct BrowserSession {
    /// Display name, e.g. "login-page"
    pub id: String,
    /// The browser instance
    browser: Arc<RwLock<Option<Browser>>>,
    /// Current active page
    page: Arc<RwLock<Option<Page>>>,
    /// Whether the session is alive
    alive: Arc<AtomicBool>,
}

impl BrowserSession {
    /// Launch a fresh browser with its own profile directory
    ///
    /// A unique user data dir per run guarantees the session starts
    /// unauthenticated, which the redirect checks depend on.
    pub async fn launch(name: &str, config: &CheckConfig) -> Result<Self, CheckError> {
        info!("Launching browser session {} (headless: {})", name, config.headless);

        if config.chrome_path.is_none() && find_chrome().is_none() {
            return Err(CheckError::LaunchFailed(
                "Chrome/Chromium not found. Install it or set CheckConfig::chrome_path.".to_string(),
            ));
        }

        let mut builder = BrowserConfig::builder();

        if config.headless {
            builder = builder.headless_mode(HeadlessMode::New);
        } else {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        } else if let Some(chrome_path) = find_chrome() {
            debug!("Auto-detected Chrome at: {}", chrome_path.display());
            builder = builder.chrome_executable(chrome_path);
        }

        let user_data_dir = std::env::temp_dir()
            .join("portfolio-ui-checks")
            .join(format!("{}-{}", name, chrono::Utc::now().timestamp_millis()));
        std::fs::create_dir_all(&user_data_dir)?;
        builder = builder.user_data_dir(&user_data_dir);

        builder = builder
            .window_size(config.window_width, config.window_height)
            .arg("--disable-notifications")
            // Required when running as root (e.g., in Docker or on a CI box)
            .arg("--no-sandbox");

        let browser_config = builder
            .build()
            .map_err(CheckError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CheckError::LaunchFailed(e.to_string()))?;

        // Drive the CDP event loop in the background. When the handler ends,
        // Chrome has disconnected or crashed.
        let name_clone = name.to_string();
        let alive_flag = Arc::new(AtomicBool::new(true));
        let alive_for_handler = alive_flag.clone();
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Session {} handler error: {:?}", name_clone, e);
                }
            }
            warn!("Session {} Chrome disconnected (event handler ended)", name_clone);
            alive_for_handler.store(false, Ordering::Relaxed);
        });

        // Chrome opens with a blank tab; use it and close any extras
        let page = {
            let mut pages = browser
                .pages()
                .await
                .map_err(|e| CheckError::LaunchFailed(e.to_string()))?;

            let main_page = if !pages.is_empty() {
                pages.remove(0)
            } else {
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| CheckError::LaunchFailed(e.to_string()))?
            };

            for extra_page in pages {
                debug!("Closing extra blank tab");
                let _ = extra_page.close().await;
            }

            main_page
        };

        info!("Browser session {} created", name);

        Ok(Self {
            id: name.to_string(),
            browser: Arc::new(RwLock::new(Some(browser))),
            page: Arc::new(RwLock::new(Some(page))),
            alive: alive_flag,
        })
    }

    /// Check if the session is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Navigate to a URL and wait for the page to load
    pub async fn navigate(&self, url: &str) -> Result<(), CheckError> {
        let page = self.page.read().await;
        let page = page
            .as_ref()
            .ok_or_else(|| CheckError::ConnectionLost("No active page".into()))?;

        debug!("Session {} navigating to: {}", self.id, url);
        tokio::time::timeout(NAVIGATION_TIMEOUT, page.goto(url))
            .await
            .map_err(|_| CheckError::NavigationFailed(format!("{url}: load timed out")))?
            .map_err(|e| CheckError::NavigationFailed(format!("{url}: {e}")))?;

        Ok(())
    }

    /// Execute JavaScript on the page with the default timeout
    pub async fn execute_js(&self, script: &str) -> Result<serde_json::Value, CheckError> {
        self.execute_js_with_timeout(script, SCRIPT_TIMEOUT).await
    }

    /// Execute JavaScript on the page with a custom timeout
    pub async fn execute_js_with_timeout(
        &self,
        script: &str,
        timeout: Duration,
    ) -> Result<serde_json::Value, CheckError> {
        let page = self.page.read().await;
        let page = page
            .as_ref()
            .ok_or_else(|| CheckError::ConnectionLost("No active page".into()))?;

        let result = tokio::time::timeout(timeout, page.evaluate(script))
            .await
            .map_err(|_| {
                CheckError::JavaScriptError(format!(
                    "evaluation timed out after {}s",
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| CheckError::JavaScriptError(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Get the current page URL
    pub async fn current_url(&self) -> Result<String, CheckError> {
        let page = self.page.read().await;
        let page = page
            .as_ref()
            .ok_or_else(|| CheckError::ConnectionLost("No active page".into()))?;

        page.url()
            .await
            .map_err(|e| CheckError::ConnectionLost(e.to_string()))?
            .ok_or_else(|| CheckError::ConnectionLost("No URL".into()))
    }

    /// Set the value of exactly one form field
    pub async fn fill(&self, locator: &Locator, text: &str) -> Result<(), CheckError> {
        debug!("Session {} filling {}", self.id, locator);

        // React controlled inputs ignore direct .value writes, so go through
        // the native prototype setter before dispatching the input event.
        let script = format!(
            r#"(function() {{
                const matches = {candidates};
                if (matches.length !== 1) return {{ count: matches.length }};
                const field = matches[0];
                field.focus();
                const proto = field instanceof HTMLTextAreaElement
                    ? window.HTMLTextAreaElement.prototype
                    : window.HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value');
                if (setter && setter.set) {{
                    setter.set.call(field, {text});
                }} else {{
                    field.value = {text};
                }}
                field.dispatchEvent(new Event('input', {{ bubbles: true }}));
                field.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return {{ count: 1 }};
            }})()"#,
            candidates = locator.candidates_js(),
            text = js_quote(text),
        );

        let result = self.execute_js(&script).await?;
        require_unique(locator, &result)
    }

    /// Click exactly one interactive element
    pub async fn click(&self, locator: &Locator) -> Result<(), CheckError> {
        debug!("Session {} clicking {}", self.id, locator);

        let script = format!(
            r#"(function() {{
                const matches = {candidates};
                if (matches.length !== 1) return {{ count: matches.length }};
                const el = matches[0];
                el.scrollIntoView({{ block: 'center' }});
                el.click();
                return {{ count: 1 }};
            }})()"#,
            candidates = locator.candidates_js(),
        );

        let result = self.execute_js(&script).await?;
        require_unique(locator, &result)
    }

    /// Poll until the located element is visible, with the default timeout
    pub async fn expect_visible(&self, locator: &Locator) -> Result<(), CheckError> {
        self.expect_visible_within(locator, DEFAULT_EXPECT_TIMEOUT).await
    }

    /// Poll until the located element is visible or the timeout elapses
    ///
    /// Zero matches keeps polling (the page may still be rendering); more
    /// than one match is an immediate ambiguity error.
    pub async fn expect_visible_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), CheckError> {
        let script = format!(
            r#"(function() {{
                const matches = {candidates};
                const visible = matches.filter(el =>
                    el.offsetParent !== null || el === document.body || el === document.documentElement);
                return {{ count: matches.length, visible: visible.length }};
            }})()"#,
            candidates = locator.candidates_js(),
        );

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let result = self.execute_js(&script).await?;
            let count = result.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
            let visible = result.get("visible").and_then(|v| v.as_u64()).unwrap_or(0);

            if count > 1 {
                return Err(CheckError::AmbiguousLocator {
                    locator: locator.to_string(),
                    count,
                });
            }
            if count == 1 && visible == 1 {
                debug!("Session {} {} is visible", self.id, locator);
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(CheckError::timeout(
                    format!("{locator} not visible"),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Poll until the current URL matches, with the default timeout
    pub async fn expect_url(&self, pattern: &UrlPattern) -> Result<(), CheckError> {
        self.expect_url_within(pattern, DEFAULT_EXPECT_TIMEOUT).await
    }

    /// Poll until the current URL matches the pattern or the timeout elapses
    pub async fn expect_url_within(
        &self,
        pattern: &UrlPattern,
        timeout: Duration,
    ) -> Result<(), CheckError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let url = self.current_url().await?;
            if pattern.matches(&url) {
                debug!("Session {} {} satisfied by {}", self.id, pattern, url);
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(CheckError::timeout(
                    format!("{pattern} (last url: {url})"),
                    timeout,
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Capture the rendered page to a PNG file
    pub async fn screenshot(&self, path: &std::path::Path) -> Result<(), CheckError> {
        let page = self.page.read().await;
        let page = page
            .as_ref()
            .ok_or_else(|| CheckError::ConnectionLost("No active page".into()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        page.save_screenshot(
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build(),
            path,
        )
        .await
        .map_err(|e| CheckError::ScreenshotFailed(format!("{}: {e}", path.display())))?;

        info!("Session {} screenshot saved to {}", self.id, path.display());
        Ok(())
    }

    /// Close the browser session
    pub async fn close(&self) -> Result<(), CheckError> {
        self.alive.store(false, Ordering::Relaxed);

        {
            let mut page = self.page.write().await;
            if let Some(p) = page.take() {
                let _ = p.close().await;
            }
        }

        {
            let mut browser = self.browser.write().await;
            if let Some(mut b) = browser.take() {
                // Graceful close first, then force kill so no Chrome child
                // processes outlive the check
                let _ = b.close().await;
                tokio::time::sleep(Duration::from_millis(500)).await;
                let _ = b.kill().await;
            }
        }

        info!("Browser session {} closed", self.id);
        Ok(())
    }
}

/// Apply the one-element rule to a `{ count: N }` script result
fn require_unique(locator: &Locator, result: &serde_json::Value) -> Result<(), CheckError> {
    let count = result.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
    match count {
        1 => Ok(()),
        0 => Err(CheckError::ElementNotFound(locator.to_string())),
        n => Err(CheckError::AmbiguousLocator {
            locator: locator.to_string(),
            count: n,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_url_match_ignores_trailing_slash() {
        let pattern = UrlPattern::exact("http://localhost:3000/login");
        assert!(pattern.matches("http://localhost:3000/login"));
        assert!(pattern.matches("http://localhost:3000/login/"));
        assert!(!pattern.matches("http://localhost:3000/dashboard"));
        assert!(!pattern.matches("http://localhost:3000/login/reset"));
    }

    #[test]
    fn test_contains_url_match() {
        let pattern = UrlPattern::contains("dashboard");
        assert!(pattern.matches("http://localhost:3000/dashboard"));
        assert!(pattern.matches("http://localhost:3000/dashboard?tab=1"));
        assert!(!pattern.matches("http://localhost:3000/login"));
    }

    #[test]
    fn test_unique_match_rule() {
        let locator = Locator::button("Sign In");
        let result_for = |count: u64| serde_json::json!({ "count": count });

        assert!(require_unique(&locator, &result_for(1)).is_ok());
        assert!(matches!(
            require_unique(&locator, &result_for(0)),
            Err(CheckError::ElementNotFound(_))
        ));
        assert!(matches!(
            require_unique(&locator, &result_for(3)),
            Err(CheckError::AmbiguousLocator { count: 3, .. })
        ));
        // Missing count field is treated as no match
        assert!(matches!(
            require_unique(&locator, &serde_json::Value::Null),
            Err(CheckError::ElementNotFound(_))
        ));
    }
}
