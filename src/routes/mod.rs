use actix_web::web;

/// # Health Check Endpoint
///
/// `GET /health` returns the service status, crate version and a timestamp.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "UP",
///   "version": "0.1.0",
///   "timestamp": "2024-10-05T12:34:56.789Z"
/// }
/// ```
pub mod health;

/// # Email List Endpoints
///
/// Both take two CSV files as text in a JSON body and read the `email`
/// column of each.
///
/// - `POST /deduplicate`: addresses present in both files vs. in only one
/// - `POST /verify`: deduplicates, then checks syntax, MX records and SMTP
///   acceptance of every unique address
///
/// `?format=csv` turns either response into a single-column CSV download.
///
/// ## Example Request
/// ```json
/// { "first_csv": "Email\na@test.com\n", "second_csv": "email\nb@test.com\n" }
/// ```
pub mod lists;

/// GraphQL endpoint and playground.
pub mod graphql;


/// # API Route Configuration
///
/// Mounts every endpoint under the `/api/v1` base path.
///
/// ```text
/// GET  /api/v1/health       - Service health status
/// POST /api/v1/deduplicate  - Compare two email lists
/// POST /api/v1/verify       - Compare, then verify the unique emails
/// POST /api/v1/graphql      - GraphQL endpoint
/// GET  /api/v1/playground   - GraphQL playground
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(lists::configure_routes)
            .configure(graphql::configure_routes),
    );
}
