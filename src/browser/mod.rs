//! Browser automation module
//!
//! Handles launching and controlling a single headless Chromium instance
//! for scripted page verification.

mod errors;
mod locator;
mod session;

pub use errors::CheckError;
pub use locator::{Locator, Role};
pub use session::{BrowserSession, UrlPattern};
