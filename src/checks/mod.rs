//! The verification scripts
//!
//! Each submodule is one fixed navigate/assert/screenshot sequence. Steps run
//! strictly in program order; the first unmet condition aborts the rest of
//! the script with a descriptive error.

mod login_page;
mod protected_routes;
mod signup;

pub use login_page::verify_login_page;
pub use protected_routes::verify_protected_routes;
pub use signup::verify_signup;

use rand::Rng;

/// Build a never-before-used signup email for this run
///
/// Epoch seconds plus a random suffix, so two runs inside the same second
/// still register distinct accounts.
pub(crate) fn unique_email() -> String {
    let stamp = chrono::Utc::now().timestamp();
    let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
    format!("user_{stamp}_{suffix}@example.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_email_shape() {
        let email = unique_email();
        assert!(email.starts_with("user_"), "got: {email}");
        assert!(email.ends_with("@example.com"));

        let middle = email
            .trim_start_matches("user_")
            .trim_end_matches("@example.com");
        let mut parts = middle.split('_');
        let stamp: i64 = parts.next().unwrap().parse().unwrap();
        let suffix: u32 = parts.next().unwrap().parse().unwrap();
        assert!(stamp > 0);
        assert!((1000..10000).contains(&suffix));
    }

    #[test]
    fn test_unique_email_varies_across_calls() {
        let emails: std::collections::HashSet<String> =
            (0..32).map(|_| unique_email()).collect();
        // 32 draws from a 9000-value suffix space within the same second
        // should essentially never fully collide
        assert!(emails.len() > 1);
    }
}
