//! Browser check error types

use thiserror::Error;

/// Errors raised while driving the browser through a check
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript error: {0}")]
    JavaScriptError(String),

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Ambiguous locator {locator}: matched {count} elements")]
    AmbiguousLocator { locator: String, count: u64 },

    #[error("Expectation not met within {waited_ms}ms: {message}")]
    ExpectationTimeout { message: String, waited_ms: u64 },

    #[error("Target server unavailable: {0}")]
    ServerUnavailable(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CheckError {
    pub(crate) fn timeout(message: impl Into<String>, waited: std::time::Duration) -> Self {
        Self::ExpectationTimeout {
            message: message.into(),
            waited_ms: waited.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_message_includes_wait() {
        let err = CheckError::timeout("heading \"Portfolios\" not visible", Duration::from_secs(20));
        let text = err.to_string();
        assert!(text.contains("20000ms"), "got: {text}");
        assert!(text.contains("Portfolios"));
    }

    #[test]
    fn test_ambiguous_locator_display() {
        let err = CheckError::AmbiguousLocator {
            locator: "button \"Sign In\"".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous locator button \"Sign In\": matched 2 elements"
        );
    }
}
