use crate::error::ListCheckError;
use crate::handlers::dedup;
use crate::handlers::export::{self, CsvDownload};
use crate::handlers::validation::pipeline::Verifier;
use crate::models::email::EmailSet;
use crate::models::report::{
    DeduplicationReport, DuplicateScope, VerificationReport, VerificationResult,
};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Two CSV files, sent as text.
#[derive(Deserialize, ToSchema)]
pub struct ListUploadRequest {
    pub first_csv: String,
    pub second_csv: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub scope: DuplicateScope,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeduplicationResponse {
    pub duplicate_count: usize,
    pub unique_count: usize,
    pub duplicates: Vec<String>,
    pub unique_emails: Vec<String>,
}

impl From<&DeduplicationReport> for DeduplicationResponse {
    fn from(report: &DeduplicationReport) -> Self {
        Self {
            duplicate_count: report.duplicate_count(),
            unique_count: report.unique_count(),
            duplicates: report.duplicates.to_strings(),
            unique_emails: report.unique_emails.to_strings(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct EmailValidationError {
    pub code: String,
    pub message: String,
}

/// An email that failed verification, with the check flags and the reason.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct InvalidEmailResult {
    pub email: String,
    pub syntax_valid: bool,
    pub mx_valid: bool,
    pub smtp_valid: bool,
    pub error: Option<EmailValidationError>,
}

impl From<&VerificationResult> for InvalidEmailResult {
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

#[derive(Serialize, Deserialize, ToSchema)]
pub struct VerificationResponse {
    pub run_id: String,
    pub checked_at: String,
    pub deduplication: DeduplicationResponse,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub valid_emails: Vec<String>,
    pub invalid_emails: Vec<InvalidEmailResult>,
}

impl From<&VerificationReport> for VerificationResponse {
    fn from(report: &VerificationReport) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            checked_at: report.checked_at.to_rfc3339(),
            deduplication: DeduplicationResponse::from(&report.deduplication),
            valid_count: report.valid_count(),
            invalid_count: report.invalid_count(),
            valid_emails: report.valid.to_strings(),
            invalid_emails: report.invalid.iter().map(InvalidEmailResult::from).collect(),
        }
    }
}

/// # Deduplicate Two Email Lists
///
/// Reads the `email` column of both CSV files and reports which addresses
/// appear in both (duplicates) and which appear in only one (unique).
/// Addresses are trimmed and lower-cased before comparison.
///
/// ## Query Parameters
/// - `format`: `json` (default) or `csv` for a `unique_emails.csv` download
/// - `scope`: `cross_file` (default) or `any_repeat`
///
/// ## Responses
/// - **200 OK**: Deduplication report, or the CSV download
/// - **400 Bad Request**: `MISSING_EMAIL_COLUMN` or `INVALID_CSV`
///
/// ## Example Request
/// ```json
/// {
///   "first_csv": "Email\na@test.com\nb@test.com\n",
///   "second_csv": "email\nb@test.com\nc@test.com\n"
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/deduplicate",
    request_body = ListUploadRequest,
    params(
        ("format" = Option<String>, Query, description = "`json` (default) or `csv`"),
        ("scope" = Option<String>, Query, description = "`cross_file` (default) or `any_repeat`")
    ),
    responses(
        (status = 200, description = "Deduplication report", body = DeduplicationResponse),
        (status = 400, description = "Missing email column or unreadable CSV")
    ),
    tag = "Email Lists"
)]
#[post("/deduplicate")]
pub async fn deduplicate(
    req: web::Json<ListUploadRequest>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ListCheckError> {
    let report = dedup::deduplicate_csv(&req.first_csv, &req.second_csv, query.scope)?;

    match query.format {
        OutputFormat::Json => Ok(HttpResponse::Ok().json(DeduplicationResponse::from(&report))),
        OutputFormat::Csv => csv_download(&export::UNIQUE_EMAILS, &report.unique_emails),
    }
}

/// # Deduplicate and Verify Two Email Lists
///
/// Deduplicates like `/deduplicate`, then verifies every unique address in
/// turn: syntax, then MX lookup, then an SMTP `RCPT TO` probe against the
/// first mail exchange. A failed check skips the remaining ones for that
/// address.
///
/// ## Responses
/// - **200 OK**: Verification report, or a `valid_emails.csv` download with
///   `format=csv`
/// - **400 Bad Request**: `MISSING_EMAIL_COLUMN` or `INVALID_CSV`
#[utoipa::path(
    post,
    path = "/api/v1/verify",
    request_body = ListUploadRequest,
    params(
        ("format" = Option<String>, Query, description = "`json` (default) or `csv`"),
        ("scope" = Option<String>, Query, description = "`cross_file` (default) or `any_repeat`")
    ),
    responses(
        (status = 200, description = "Verification report", body = VerificationResponse),
        (status = 400, description = "Missing email column or unreadable CSV")
    ),
    tag = "Email Lists"
)]
#[post("/verify")]
pub async fn verify(
    req: web::Json<ListUploadRequest>,
    query: web::Query<ListQuery>,
    verifier: web::Data<Verifier>,
) -> Result<HttpResponse, ListCheckError> {
    let report = verifier
        .verify_csv(&req.first_csv, &req.second_csv, query.scope)
        .await?;

    match query.format {
        OutputFormat::Json => Ok(HttpResponse::Ok().json(VerificationResponse::from(&report))),
        OutputFormat::Csv => csv_download(&export::VALID_EMAILS, &report.valid),
    }
}

fn csv_download(download: &CsvDownload, emails: &EmailSet) -> Result<HttpResponse, ListCheckError> {
    let body = export::write_single_column(download, emails)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(download.file_name.to_string())],
        })
        .body(body))
}

/// Registers `POST /deduplicate` and `POST /verify`.
///
/// `/verify` needs a `web::Data<Verifier>` in the app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(deduplicate).service(verify);
}
