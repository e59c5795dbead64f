//! Input validation for the public endpoints

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern compiles"));

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Lowercase ASCII letters, digits and hyphens, at least one character
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Trim and lowercase an email address before it is checked or stored
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check on an already normalized address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert!(is_valid_slug("post-1"));
        assert!(is_valid_slug("2024-recap"));
        assert!(is_valid_slug("-"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Has Spaces"));
        assert!(!is_valid_slug("UPPER"));
        assert!(!is_valid_slug("under_score"));
        assert!(!is_valid_slug("post-1\n"));
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  A@Example.com "), "a@example.com");
        assert_eq!(normalize_email("a@example.com"), "a@example.com");
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("a@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }
}
