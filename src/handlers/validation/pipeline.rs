use super::CheckOutcome;
use super::dnsmx::{DnsMxResolver, MxResolver};
use super::smtp::{MailboxProber, SmtpProber};
use super::syntax;
use crate::config::AppConfig;
use crate::error::ListCheckError;
use crate::handlers::dedup;
use crate::models::email::{EmailRecord, EmailSet};
use crate::models::report::{
    CheckStage, DuplicateScope, VerificationFailure, VerificationReport, VerificationResult,
};
use log::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Valid,
    Invalid,
}

/// Where one email stands in the syntax → MX → SMTP sequence.
///
/// ```text
/// Pending ─▶ SyntaxChecked ─pass─▶ MxChecked ─pass─▶ SmtpChecked ─▶ Classified
///                 │ fail               │ fail
///                 └────────────────────┴──────────────────────────▶ Classified
/// ```
///
/// `Classified` is terminal: advancing it yields the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    Pending,
    SyntaxChecked { passed: bool },
    /// `exchange` is the first MX host when the lookup passed, `None` otherwise.
    MxChecked { exchange: Option<String> },
    SmtpChecked { passed: bool },
    Classified(Classification),
}

/// One email moving through the verification state machine.
#[derive(Debug, Clone)]
pub struct EmailVerification {
    state: VerificationState,
    result: VerificationResult,
}

impl EmailVerification {
    pub fn new(email: EmailRecord) -> Self {
        Self {
            state: VerificationState::Pending,
            result: VerificationResult::pending(email),
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    pub fn result(&self) -> &VerificationResult {
        &self.result
    }

    pub fn is_classified(&self) -> bool {
        matches!(self.state, VerificationState::Classified(_))
    }

    pub fn into_result(self) -> VerificationResult {
        self.result
    }

    /// Performs exactly one transition.
    ///
    /// Only the transition out of `Pending` (syntax), `SyntaxChecked{pass}`
    /// (MX) and `MxChecked{pass}` (SMTP) touch a check; a failed state goes
    /// straight to `Classified(Invalid)`, so later checks never run.
    pub async fn advance(mut self, verifier: &Verifier) -> Self {
        let state = std::mem::replace(&mut self.state, VerificationState::Pending);

        self.state = match state {
            VerificationState::Pending => self.check_syntax(),
            VerificationState::SyntaxChecked { passed: true } => {
                self.check_mx(verifier.resolver.as_ref()).await
            }
            VerificationState::MxChecked {
                exchange: Some(exchange),
            } => self.check_smtp(verifier.prober.as_ref(), &exchange).await,
            VerificationState::SmtpChecked { passed: true } => {
                VerificationState::Classified(Classification::Valid)
            }
            VerificationState::SyntaxChecked { passed: false }
            | VerificationState::MxChecked { exchange: None }
            | VerificationState::SmtpChecked { passed: false } => {
                VerificationState::Classified(Classification::Invalid)
            }
            classified @ VerificationState::Classified(_) => classified,
        };

        debug!("{} -> {:?}", self.result.email, self.state);
        self
    }

    fn check_syntax(&mut self) -> VerificationState {
        let passed = syntax::is_valid_email(self.result.email.as_str());
        self.result.syntax_valid = passed;
        if !passed {
            self.result.failure = Some(VerificationFailure::SyntaxInvalid);
        }
        VerificationState::SyntaxChecked { passed }
    }

    async fn check_mx(&mut self, resolver: &dyn MxResolver) -> VerificationState {
        let Some(domain) = self.result.email.domain().map(str::to_owned) else {
            self.result.failure = Some(VerificationFailure::MxUnresolvable {
                reason: "address has no domain".to_string(),
            });
            return VerificationState::MxChecked { exchange: None };
        };

        let exchange = match resolver.lookup_mx(&domain).await {
            CheckOutcome::Passed(exchanges) => exchanges.into_iter().next(),
            CheckOutcome::Failed(reason) => {
                self.result.failure = Some(VerificationFailure::MxUnresolvable { reason });
                return VerificationState::MxChecked { exchange: None };
            }
            CheckOutcome::Unavailable(reason) => {
                warn!("MX lookup for {domain} could not be performed: {reason}");
                self.result.failure = Some(VerificationFailure::NetworkTransientFailure {
                    stage: CheckStage::Mx,
                    reason,
                });
                return VerificationState::MxChecked { exchange: None };
            }
        };

        match exchange {
            Some(exchange) => {
                self.result.mx_valid = true;
                VerificationState::MxChecked {
                    exchange: Some(exchange),
                }
            }
            None => {
                self.result.failure = Some(VerificationFailure::MxUnresolvable {
                    reason: format!("{domain} has no MX records"),
                });
                VerificationState::MxChecked { exchange: None }
            }
        }
    }

    async fn check_smtp(&mut self, prober: &dyn MailboxProber, exchange: &str) -> VerificationState {
        let passed = match prober.probe(exchange, self.result.email.as_str()).await {
            CheckOutcome::Passed(()) => true,
            CheckOutcome::Failed(reason) => {
                self.result.failure = Some(VerificationFailure::SmtpRejected { reason });
                false
            }
            CheckOutcome::Unavailable(reason) => {
                warn!(
                    "SMTP probe of {} via {exchange} could not be performed: {reason}",
                    self.result.email
                );
                self.result.failure = Some(VerificationFailure::NetworkTransientFailure {
                    stage: CheckStage::Smtp,
                    reason,
                });
                false
            }
        };

        self.result.smtp_valid = passed;
        VerificationState::SmtpChecked { passed }
    }
}

/// Runs the three-stage check over emails, one at a time.
///
/// No retries, no parallelism: each email is classified before the next one
/// starts, and a failing check only affects its own email.
pub struct Verifier {
    resolver: Box<dyn MxResolver>,
    prober: Box<dyn MailboxProber>,
}

impl Verifier {
    pub fn new(
        resolver: impl MxResolver + 'static,
        prober: impl MailboxProber + 'static,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            prober: Box::new(prober),
        }
    }

    /// System DNS resolver plus an SMTP prober using the configured
    /// sender, HELO name, port and timeout.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DnsMxResolver::from_system_conf(),
            SmtpProber::new(config.smtp.clone()),
        )
    }

    pub async fn verify_email(&self, email: &EmailRecord) -> VerificationResult {
        let mut verification = EmailVerification::new(email.clone());
        while !verification.is_classified() {
            verification = verification.advance(self).await;
        }
        verification.into_result()
    }

    pub async fn verify_all(&self, emails: &EmailSet) -> Vec<VerificationResult> {
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            results.push(self.verify_email(email).await);
        }
        results
    }

    /// Deduplicates two uploads, then verifies the unique emails.
    ///
    /// # Errors
    /// Only upload-level problems (missing email column, unreadable CSV);
    /// per-email failures end up in [`VerificationReport::invalid`].
    pub async fn verify_csv(
        &self,
        first_csv: &str,
        second_csv: &str,
        scope: DuplicateScope,
    ) -> Result<VerificationReport, ListCheckError> {
        let deduplication = dedup::deduplicate_csv(first_csv, second_csv, scope)?;
        let run_id = Uuid::new_v4();
        info!(
            "Run {run_id}: verifying {} unique email(s)",
            deduplication.unique_count()
        );

        let results = self.verify_all(&deduplication.unique_emails).await;
        let report = VerificationReport::from_results(run_id, deduplication, results);
        info!(
            "Run {run_id}: {} valid, {} invalid",
            report.valid_count(),
            report.invalid_count()
        );
        Ok(report)
    }
}
