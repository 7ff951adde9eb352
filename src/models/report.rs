use crate::models::email::{EmailRecord, EmailSet};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

/// Which repeats count as duplicates.
///
/// - `CrossFile`: an address is a duplicate when it appears in both files.
/// - `AnyRepeat`: an address is also a duplicate when it appears more than
///   once inside a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateScope {
    #[default]
    CrossFile,
    AnyRepeat,
}

/// Outcome of comparing the two uploaded lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeduplicationReport {
    pub duplicates: EmailSet,
    pub unique_emails: EmailSet,
}

impl DeduplicationReport {
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    pub fn unique_count(&self) -> usize {
        self.unique_emails.len()
    }
}

/// Check stage at which a network-level failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    Mx,
    Smtp,
}

impl fmt::Display for CheckStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStage::Mx => f.write_str("MX lookup"),
            CheckStage::Smtp => f.write_str("SMTP probe"),
        }
    }
}

/// Why an email was classified invalid.
///
/// `NetworkTransientFailure` marks a check that could not be performed (DNS
/// timeout, refused connection, ...). The boolean flags on
/// [`VerificationResult`] do not tell it apart from a genuine negative; this
/// diagnostic does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    SyntaxInvalid,
    MxUnresolvable { reason: String },
    SmtpRejected { reason: String },
    NetworkTransientFailure { stage: CheckStage, reason: String },
}

impl VerificationFailure {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationFailure::SyntaxInvalid => "INVALID_SYNTAX",
            VerificationFailure::MxUnresolvable { .. } => "MX_UNRESOLVABLE",
            VerificationFailure::SmtpRejected { .. } => "SMTP_REJECTED",
            VerificationFailure::NetworkTransientFailure { .. } => "NETWORK_TRANSIENT_FAILURE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            VerificationFailure::SyntaxInvalid => "Email address has invalid syntax".to_string(),
            VerificationFailure::MxUnresolvable { reason } => {
                format!("Email domain has no MX records: {reason}")
            }
            VerificationFailure::SmtpRejected { reason } => {
                format!("Mail server did not accept the recipient: {reason}")
            }
            VerificationFailure::NetworkTransientFailure { stage, reason } => {
                format!("{stage} could not be performed: {reason}")
            }
        }
    }
}

/// Per-email verification flags plus an optional failure diagnostic.
///
/// A flag is `false` both when its check failed and when it never ran
/// because an earlier check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub email: EmailRecord,
    pub syntax_valid: bool,
    pub mx_valid: bool,
    pub smtp_valid: bool,
    pub failure: Option<VerificationFailure>,
}

impl VerificationResult {
    pub fn pending(email: EmailRecord) -> Self {
        Self {
            email,
            syntax_valid: false,
            mx_valid: false,
            smtp_valid: false,
            failure: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.syntax_valid && self.mx_valid && self.smtp_valid
    }
}

/// Everything produced by one upload-and-verify cycle.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub run_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub deduplication: DeduplicationReport,
    pub valid: EmailSet,
    pub invalid: Vec<VerificationResult>,
}

impl VerificationReport {
    /// Splits results into the valid set and the invalid diagnostics.
    pub fn from_results(
        run_id: Uuid,
        deduplication: DeduplicationReport,
        results: Vec<VerificationResult>,
    ) -> Self {
        let (valid, invalid): (Vec<_>, Vec<_>) =
            results.into_iter().partition(VerificationResult::is_valid);

        Self {
            run_id,
            checked_at: Utc::now(),
            deduplication,
            valid: valid.into_iter().map(|result| result.email).collect(),
            invalid,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }
}
