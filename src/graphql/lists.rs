use crate::error::ListCheckError;
use crate::handlers::dedup;
use crate::handlers::validation::pipeline::Verifier;
use crate::models::report::{
    DeduplicationReport, DuplicateScope, VerificationReport, VerificationResult,
};
use async_graphql::{Context, Error, ErrorExtensions, Object, Result, SimpleObject};
use std::sync::Arc;

/// Outcome of comparing two email lists
#[derive(SimpleObject)]
pub struct Deduplication {
    pub duplicate_count: i32,
    pub unique_count: i32,
    /// Addresses counted as duplicates, sorted
    pub duplicates: Vec<String>,
    /// Addresses that are not duplicates, sorted
    pub unique_emails: Vec<String>,
}

impl From<&DeduplicationReport> for Deduplication {
    fn from(report: &DeduplicationReport) -> Self {
        Self {
            duplicate_count: count(report.duplicate_count()),
            unique_count: count(report.unique_count()),
            duplicates: report.duplicates.to_strings(),
            unique_emails: report.unique_emails.to_strings(),
        }
    }
}

/// Why an email failed verification
#[derive(SimpleObject)]
pub struct EmailValidationError {
    /// INVALID_SYNTAX, MX_UNRESOLVABLE, SMTP_REJECTED or NETWORK_TRANSIENT_FAILURE
    pub code: String,
    pub message: String,
}

#[derive(SimpleObject)]
pub struct InvalidEmail {
    pub email: String,
    pub syntax_valid: bool,
    pub mx_valid: bool,
    pub smtp_valid: bool,
    pub error: Option<EmailValidationError>,
}

impl From<&VerificationResult> for InvalidEmail {
    fn from(result: &VerificationResult) -> Self {
        Self {
            email: result.email.to_string(),
            syntax_valid: result.syntax_valid,
            mx_valid: result.mx_valid,
            smtp_valid: result.smtp_valid,
            error: result.failure.as_ref().map(|failure| EmailValidationError {
                code: failure.code().to_string(),
                message: failure.message(),
            }),
        }
    }
}

/// Deduplication plus the verification verdict for every unique email
#[derive(SimpleObject)]
pub struct Verification {
    pub run_id: String,
    pub checked_at: String,
    pub deduplication: Deduplication,
    pub valid_count: i32,
    pub invalid_count: i32,
    pub valid_emails: Vec<String>,
    pub invalid_emails: Vec<InvalidEmail>,
}

impl From<&VerificationReport> for Verification {
    fn from(report: &VerificationReport) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            checked_at: report.checked_at.to_rfc3339(),
            deduplication: Deduplication::from(&report.deduplication),
            valid_count: count(report.valid_count()),
            invalid_count: count(report.invalid_count()),
            valid_emails: report.valid.to_strings(),
            invalid_emails: report.invalid.iter().map(InvalidEmail::from).collect(),
        }
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl ErrorExtensions for ListCheckError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Email list queries. `verify` needs an `Arc<Verifier>` in the schema data.
#[derive(Default)]
pub struct EmailListQuery;

#[Object]
impl EmailListQuery {
    /// Compares the `email` columns of two CSV files
    async fn deduplicate(
        &self,
        first_csv: String,
        second_csv: String,
        #[graphql(default)] scope: DuplicateScope,
    ) -> Result<Deduplication> {
        let report = dedup::deduplicate_csv(&first_csv, &second_csv, scope)
            .map_err(|e| e.extend())?;
        Ok(Deduplication::from(&report))
    }

    /// Deduplicates two CSV files, then verifies every unique email
    async fn verify(
        &self,
        ctx: &Context<'_>,
        first_csv: String,
        second_csv: String,
        #[graphql(default)] scope: DuplicateScope,
    ) -> Result<Verification> {
        let verifier = ctx.data::<Arc<Verifier>>()?;
        let report = verifier
            .verify_csv(&first_csv, &second_csv, scope)
            .await
            .map_err(|e| e.extend())?;
        Ok(Verification::from(&report))
    }
}
