use regex::Regex;
use std::sync::LazyLock;

/// Local part of alphanumerics and `. _ + -`, an `@`, one domain label of
/// alphanumerics and `-`, then a dot and the rest of the domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// Pattern-based syntax check.
///
/// # Examples
/// ```
/// use email_list_checker::handlers::validation::syntax::is_valid_email;
///
/// assert!(is_valid_email("user.name+tag@sub.domain.com"));
/// assert!(!is_valid_email("not-an-email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_standard_emails() {
        assert!(is_valid_email("simple@example.com"));
        assert!(is_valid_email("very.common@example.com"));
        assert!(is_valid_email("x@example.com"));
        assert!(is_valid_email("user.name+tag@sub.domain.com"));
        assert!(is_valid_email("under_score-dash@my-domain.co.uk"));
    }

    #[test]
    fn case_is_accepted() {
        assert!(is_valid_email("USER@EXAMPLE.COM"));
        assert!(is_valid_email("User@Example.com"));
    }

    #[test]
    fn invalid_missing_parts() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@"));
        assert!(!is_valid_email("@missing.com"));
        assert!(!is_valid_email("nodot@localhost"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("   "));
    }

    #[test]
    fn invalid_characters() {
        assert!(!is_valid_email("spaces unquoted@example.com"));
        assert!(!is_valid_email("user@under_score.com"));
        assert!(!is_valid_email("\"quoted\"@example.com"));
        assert!(!is_valid_email("user@[192.168.0.1]"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("Pelé@example.com"));
    }

    #[test]
    fn first_domain_label_must_precede_a_dot() {
        assert!(!is_valid_email("user@.example.com"));
        assert!(is_valid_email("user@a.b"));
    }

    #[test]
    fn surrounding_whitespace_is_not_trimmed_here() {
        assert!(!is_valid_email(" user@example.com"));
        assert!(!is_valid_email("user@example.com\n"));
    }
}
