/// # Email List Deduplication
///
/// Reads the `email` column out of uploaded CSV text and compares two
/// lists (see [`dedup::deduplicate_csv`]).
pub mod dedup;

/// Single-column CSV downloads of a resulting email list.
pub mod export;

/// Syntax, MX and SMTP checks plus the per-email state machine that
/// sequences them.
pub mod validation;
