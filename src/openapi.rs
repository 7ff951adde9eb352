use utoipa::OpenApi;

/// OpenAPI document for the REST routes.
///
/// # Endpoints
/// - `GET /api/v1/health`
/// - `POST /api/v1/deduplicate`
/// - `POST /api/v1/verify`
///
/// The GraphQL endpoint describes itself through introspection and is not
/// part of this document.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::lists::deduplicate,
        crate::routes::lists::verify,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::routes::lists::ListUploadRequest,
            crate::routes::lists::DeduplicationResponse,
            crate::routes::lists::EmailValidationError,
            crate::routes::lists::InvalidEmailResult,
            crate::routes::lists::VerificationResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health monitoring"),
        (name = "Email Lists", description = "Deduplication and verification of uploaded email lists")
    ),
    info(
        description = "Compares two CSV email lists and verifies the unique addresses (syntax, MX, SMTP)",
        title = "Email List Checker API",
    )
)]
pub struct ApiDoc;
