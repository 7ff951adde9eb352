use super::CheckOutcome;
use super::dnsmx::MockMxResolver;
use super::pipeline::*;
use super::smtp::MockMailboxProber;
use crate::error::{ListCheckError, UploadSlot};
use crate::models::email::{EmailColumn, EmailRecord};
use crate::models::report::{CheckStage, DuplicateScope, VerificationFailure};
use tokio_test::assert_ok;

fn record(raw: &str) -> EmailRecord {
    EmailRecord::normalize(raw).unwrap()
}

fn resolver_with(exchanges: &'static [&'static str]) -> MockMxResolver {
    let mut resolver = MockMxResolver::new();
    resolver.expect_lookup_mx().returning(move |_| {
        CheckOutcome::Passed(exchanges.iter().map(|host| host.to_string()).collect())
    });
    resolver
}

fn accepting_prober() -> MockMailboxProber {
    let mut prober = MockMailboxProber::new();
    prober
        .expect_probe()
        .returning(|_, _| CheckOutcome::Passed(()));
    prober
}

#[tokio::test]
async fn test_invalid_syntax_skips_network_checks() {
    let mut resolver = MockMxResolver::new();
    resolver.expect_lookup_mx().never();
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();

    let verifier = Verifier::new(resolver, prober);
    let result = verifier.verify_email(&record("not-an-email")).await;

    assert!(!result.syntax_valid);
    assert!(!result.mx_valid);
    assert!(!result.smtp_valid);
    assert!(!result.is_valid());
    assert_eq!(result.failure, Some(VerificationFailure::SyntaxInvalid));
}

#[tokio::test]
async fn test_missing_mx_skips_smtp() {
    let mut resolver = MockMxResolver::new();
    resolver
        .expect_lookup_mx()
        .withf(|domain| domain == "nomx.test")
        .times(1)
        .returning(|_| CheckOutcome::Failed("no records found".to_string()));
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();

    let verifier = Verifier::new(resolver, prober);
    let result = verifier.verify_email(&record("user@nomx.test")).await;

    assert!(result.syntax_valid);
    assert!(!result.mx_valid);
    assert!(!result.smtp_valid);
    assert!(matches!(
        result.failure,
        Some(VerificationFailure::MxUnresolvable { .. })
    ));
}

#[tokio::test]
async fn test_empty_mx_answer_is_unresolvable() {
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();

    let verifier = Verifier::new(resolver_with(&[]), prober);
    let result = verifier.verify_email(&record("user@empty.test")).await;

    assert!(!result.mx_valid);
    assert!(matches!(
        result.failure,
        Some(VerificationFailure::MxUnresolvable { .. })
    ));
}

#[tokio::test]
async fn test_smtp_probes_first_exchange_only() {
    let mut prober = MockMailboxProber::new();
    prober
        .expect_probe()
        .withf(|exchange, email| exchange == "mx1.test.com" && email == "user@test.com")
        .times(1)
        .returning(|_, _| CheckOutcome::Passed(()));

    let verifier = Verifier::new(resolver_with(&["mx1.test.com", "mx2.test.com"]), prober);
    let result = verifier.verify_email(&record("User@Test.com")).await;

    assert!(result.is_valid());
    assert_eq!(result.failure, None);
}

#[tokio::test]
async fn test_rejected_recipient_is_invalid() {
    let mut prober = MockMailboxProber::new();
    prober
        .expect_probe()
        .times(1)
        .returning(|_, _| CheckOutcome::Failed("550 no such user".to_string()));

    let verifier = Verifier::new(resolver_with(&["mx.test.com"]), prober);
    let result = verifier.verify_email(&record("ghost@test.com")).await;

    assert!(result.syntax_valid);
    assert!(result.mx_valid);
    assert!(!result.smtp_valid);
    assert_eq!(
        result.failure,
        Some(VerificationFailure::SmtpRejected {
            reason: "550 no such user".to_string()
        })
    );
}

#[tokio::test]
async fn test_unavailable_mx_is_a_transient_failure() {
    let mut resolver = MockMxResolver::new();
    resolver
        .expect_lookup_mx()
        .returning(|_| CheckOutcome::Unavailable("request timed out".to_string()));
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();

    let verifier = Verifier::new(resolver, prober);
    let result = verifier.verify_email(&record("user@slow.test")).await;

    assert!(!result.mx_valid);
    assert_eq!(
        result.failure,
        Some(VerificationFailure::NetworkTransientFailure {
            stage: CheckStage::Mx,
            reason: "request timed out".to_string(),
        })
    );
}

#[tokio::test]
async fn test_unavailable_smtp_is_a_transient_failure() {
    let mut prober = MockMailboxProber::new();
    prober
        .expect_probe()
        .returning(|_, _| CheckOutcome::Unavailable("connection refused".to_string()));

    let verifier = Verifier::new(resolver_with(&["mx.test.com"]), prober);
    let result = verifier.verify_email(&record("user@test.com")).await;

    assert!(result.mx_valid);
    assert!(!result.smtp_valid);
    assert!(!result.is_valid());
    assert!(matches!(
        result.failure,
        Some(VerificationFailure::NetworkTransientFailure {
            stage: CheckStage::Smtp,
            ..
        })
    ));
}

#[tokio::test]
async fn test_advance_walks_every_state_in_order() {
    let verifier = Verifier::new(resolver_with(&["mx.test.com"]), accepting_prober());
    let mut verification = EmailVerification::new(record("user@test.com"));
    assert_eq!(verification.state(), &VerificationState::Pending);

    verification = verification.advance(&verifier).await;
    assert_eq!(
        verification.state(),
        &VerificationState::SyntaxChecked { passed: true }
    );

    verification = verification.advance(&verifier).await;
    assert_eq!(
        verification.state(),
        &VerificationState::MxChecked {
            exchange: Some("mx.test.com".to_string())
        }
    );

    verification = verification.advance(&verifier).await;
    assert_eq!(
        verification.state(),
        &VerificationState::SmtpChecked { passed: true }
    );

    verification = verification.advance(&verifier).await;
    assert_eq!(
        verification.state(),
        &VerificationState::Classified(Classification::Valid)
    );
}

#[tokio::test]
async fn test_classified_is_a_fixed_point() {
    let mut resolver = MockMxResolver::new();
    resolver.expect_lookup_mx().never();
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();
    let verifier = Verifier::new(resolver, prober);

    let mut verification = EmailVerification::new(record("bad address"));
    while !verification.is_classified() {
        verification = verification.advance(&verifier).await;
    }
    let before = verification.result().clone();

    for _ in 0..3 {
        verification = verification.advance(&verifier).await;
        assert_eq!(
            verification.state(),
            &VerificationState::Classified(Classification::Invalid)
        );
    }
    assert_eq!(verification.into_result(), before);
}

#[tokio::test]
async fn test_verify_all_isolates_failures() {
    let mut resolver = MockMxResolver::new();
    resolver.expect_lookup_mx().returning(|domain| {
        if domain == "down.test" {
            CheckOutcome::Unavailable("SERVFAIL".to_string())
        } else {
            CheckOutcome::Passed(vec![format!("mx.{domain}")])
        }
    });

    let verifier = Verifier::new(resolver, accepting_prober());
    let emails = EmailColumn::from_raw(["a@up.test", "b@down.test", "c@up.test"]).to_set();
    let results = verifier.verify_all(&emails).await;

    let valid: Vec<_> = results
        .iter()
        .filter(|result| result.is_valid())
        .map(|result| result.email.as_str())
        .collect();
    assert_eq!(results.len(), 3);
    assert_eq!(valid, vec!["a@up.test", "c@up.test"]);
}

#[tokio::test]
async fn test_verify_csv_partitions_unique_emails() {
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().returning(|_, email| {
        if email.starts_with("ghost") {
            CheckOutcome::Failed("550 unknown user".to_string())
        } else {
            CheckOutcome::Passed(())
        }
    });

    let verifier = Verifier::new(resolver_with(&["mx.test.com"]), prober);
    let first = "Email\nshared@test.com\nann@test.com\nbroken\n";
    let second = "email\nSHARED@test.com\nghost@test.com\n";

    let report = assert_ok!(
        verifier
            .verify_csv(first, second, DuplicateScope::CrossFile)
            .await
    );

    assert_eq!(report.deduplication.duplicates.to_strings(), vec!["shared@test.com"]);
    assert_eq!(report.valid.to_strings(), vec!["ann@test.com"]);

    let invalid: Vec<_> = report
        .invalid
        .iter()
        .map(|result| (result.email.as_str(), result.failure.as_ref().map(|f| f.code())))
        .collect();
    assert_eq!(
        invalid,
        vec![
            ("broken", Some("INVALID_SYNTAX")),
            ("ghost@test.com", Some("SMTP_REJECTED")),
        ]
    );
}

#[tokio::test]
async fn test_verify_csv_rejects_upload_without_email_column() {
    let mut resolver = MockMxResolver::new();
    resolver.expect_lookup_mx().never();
    let mut prober = MockMailboxProber::new();
    prober.expect_probe().never();

    let verifier = Verifier::new(resolver, prober);
    let result = verifier
        .verify_csv("name\nann\n", "Email\na@test.com\n", DuplicateScope::CrossFile)
        .await;

    assert!(matches!(
        result,
        Err(ListCheckError::MissingColumn {
            file: UploadSlot::First
        })
    ));
}
