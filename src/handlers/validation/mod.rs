/// Pattern-based email syntax check.
///
/// # Examples
/// ```
/// use email_list_checker::handlers::validation::syntax::is_valid_email;
///
/// assert!(is_valid_email("user.name+tag@sub.domain.com"));
/// assert!(!is_valid_email("not-an-email"));
/// ```
pub mod syntax;

/// MX record lookup for the domain of an email address.
///
/// [`dnsmx::MxResolver`] is the seam; [`dnsmx::DnsMxResolver`] resolves through
/// the system DNS configuration.
pub mod dnsmx;

/// Mailbox existence probe over SMTP (`HELO` / `MAIL FROM` / `RCPT TO`).
pub mod smtp;

/// Per-email verification state machine and the sequential batch verifier.
pub mod pipeline;

#[cfg(test)]
mod pipeline_test;

/// Result of a single external check.
///
/// Separates "the check ran and said no" from "the check could not be
/// performed". Both count as a failed check for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome<T = ()> {
    Passed(T),
    /// Genuine negative, e.g. NXDOMAIN or `550` to `RCPT TO`
    Failed(String),
    /// Timeout, refused connection, resolver error
    Unavailable(String),
}

impl<T> CheckOutcome<T> {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed(_))
    }
}
