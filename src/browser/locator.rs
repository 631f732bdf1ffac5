//! Element locators
//!
//! A locator is a query that must resolve to exactly one DOM element: by id,
//! by associated `<label>` text, or by accessible role plus name. Resolution
//! runs inside the page as injected JavaScript, so the uniqueness rule is
//! enforced in one place and the scripts see the same DOM the user would.

use std::fmt;

/// Accessible roles the checks query by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Heading,
}

impl Role {
    /// CSS selector covering both native elements and explicit role attributes
    fn selector(&self) -> &'static str {
        match self {
            Role::Button => r#"button, [role="button"], input[type="submit"], input[type="button"]"#,
            Role::Heading => r#"h1, h2, h3, h4, h5, h6, [role="heading"]"#,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Heading => "heading",
        }
    }
}

/// A query for exactly one DOM element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Element with the given id attribute
    Id(String),
    /// Form control associated with a `<label>` whose text matches
    Label(String),
    /// Element with the given role and accessible name
    Role { role: Role, name: String },
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    pub fn button(name: impl Into<String>) -> Self {
        Self::Role { role: Role::Button, name: name.into() }
    }

    pub fn heading(name: impl Into<String>) -> Self {
        Self::Role { role: Role::Heading, name: name.into() }
    }

    /// JavaScript expression evaluating to an array of matching elements
    ///
    /// Duplicated ids are deliberately surfaced (attribute selector instead of
    /// getElementById) so the one-element rule can reject them.
    pub(crate) fn candidates_js(&self) -> String {
        match self {
            Locator::Id(id) => format!(
                "Array.from(document.querySelectorAll('[id=' + {} + ']'))",
                js_quote(id)
            ),
            Locator::Label(text) => format!(
                r#"(function() {{
                    const wanted = {};
                    const out = [];
                    for (const label of document.querySelectorAll('label')) {{
                        if ((label.textContent || '').trim() !== wanted) continue;
                        const control = label.control
                            || (label.htmlFor ? document.getElementById(label.htmlFor) : null)
                            || label.querySelector('input, textarea, select');
                        if (control && !out.includes(control)) out.push(control);
                    }}
                    for (const el of document.querySelectorAll('input[aria-label], textarea[aria-label], select[aria-label]')) {{
                        if ((el.getAttribute('aria-label') || '').trim() === wanted && !out.includes(el)) out.push(el);
                    }}
                    return out;
                }})()"#,
                js_quote(text)
            ),
            Locator::Role { role, name } => format!(
                r#"(function() {{
                    const wanted = {}.trim().replace(/\s+/g, ' ').toLowerCase();
                    const out = [];
                    for (const el of document.querySelectorAll({})) {{
                        const name = (el.getAttribute('aria-label') || el.innerText || el.value || '')
                            .trim().replace(/\s+/g, ' ').toLowerCase();
                        if (name === wanted) out.push(el);
                    }}
                    return out;
                }})()"#,
                js_quote(name),
                js_quote(role.selector())
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id \"{id}\""),
            Locator::Label(text) => write!(f, "label \"{text}\""),
            Locator::Role { role, name } => write!(f, "{} \"{name}\"", role.label()),
        }
    }
}

/// Quote a Rust string as a JavaScript string literal
pub(crate) fn js_quote(s: &str) -> String {
    format!(
        "\"{}\"",
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_quote_escapes_specials() {
        assert_eq!(js_quote("plain"), "\"plain\"");
        assert_eq!(js_quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(js_quote(r"back\slash"), r#""back\\slash""#);
        assert_eq!(js_quote("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn test_id_candidates_use_attribute_selector() {
        let js = Locator::id("email").candidates_js();
        assert!(js.contains("querySelectorAll('[id=' + \"email\" + ']')"), "got: {js}");
    }

    #[test]
    fn test_label_candidates_embed_quoted_text() {
        let js = Locator::label("Email Address").candidates_js();
        assert!(js.contains("const wanted = \"Email Address\";"));
        assert!(js.contains("label.htmlFor"));
    }

    #[test]
    fn test_role_candidates_cover_native_and_aria() {
        let js = Locator::button("Sign In").candidates_js();
        assert!(js.contains(r#"[role=\"button\"]"#));
        assert!(js.contains("input[type="));

        let js = Locator::heading("Portfolios").candidates_js();
        assert!(js.contains("h1, h2"));
        assert!(js.contains(r#"[role=\"heading\"]"#));
    }

    #[test]
    fn test_display_names_the_query() {
        assert_eq!(Locator::id("password").to_string(), "id \"password\"");
        assert_eq!(Locator::label("First Name").to_string(), "label \"First Name\"");
        assert_eq!(Locator::button("Create Account").to_string(), "button \"Create Account\"");
        assert_eq!(Locator::heading("Welcome Back").to_string(), "heading \"Welcome Back\"");
    }
}
