/// # Email Records and Sets
///
/// Normalized addresses ([`email::EmailRecord`]), duplicate-free sets of them
/// ([`email::EmailSet`]) and the raw per-file column ([`email::EmailColumn`]).
pub mod email;

/// # Health Status Response
///
/// Operational status of the service with version and timestamp.
///
/// ## Example JSON
/// ```json
/// {
///   "status": "UP",
///   "version": "0.1.0",
///   "timestamp": "2024-03-10T15:30:45.123456789Z"
/// }
/// ```
pub mod health;

/// Deduplication and verification outcomes for one upload cycle.
pub mod report;
