use crate::error::{ListCheckError, UploadSlot};
use crate::models::email::{EmailColumn, EmailRecord, EmailSet};
use crate::models::report::{DeduplicationReport, DuplicateScope};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use std::collections::HashMap;
use std::io;

const EMAIL_COLUMN: &str = "email";

/// Index of the first header equal to `email`, ignoring case and surrounding
/// whitespace.
pub fn find_email_column(headers: &StringRecord) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().to_lowercase() == EMAIL_COLUMN)
}

/// Parses uploaded CSV text and returns the normalized values of its email
/// column.
///
/// The first row is the header. Rows may have differing lengths; a row too
/// short to reach the email column counts as a missing value, as do blank
/// cells.
///
/// # Errors
/// - [`ListCheckError::MissingColumn`] if no header is named `email`
/// - [`ListCheckError::Csv`] if the reader fails; for text input this cannot
///   happen through row lengths, see [`read_email_column_from`]
pub fn read_email_column(csv_text: &str, file: UploadSlot) -> Result<EmailColumn, ListCheckError> {
    // Spreadsheet exports often start with a UTF-8 byte order mark.
    let csv_text = csv_text.strip_prefix('\u{feff}').unwrap_or(csv_text);
    read_email_column_from(csv_text.as_bytes(), file)
}

/// Same as [`read_email_column`] over raw bytes.
///
/// [`ListCheckError::Csv`] is returned for I/O errors of `reader` and for
/// cells that are not valid UTF-8.
pub fn read_email_column_from<R: io::Read>(
    reader: R,
    file: UploadSlot,
) -> Result<EmailColumn, ListCheckError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|error| ListCheckError::Csv { file, error })?
        .clone();
    let index = find_email_column(&headers).ok_or(ListCheckError::MissingColumn { file })?;

    let mut values = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|error| ListCheckError::Csv { file, error })?;
        if let Some(email) = row.get(index).and_then(EmailRecord::normalize) {
            values.push(email);
        }
    }

    debug!("{file} file: {} email value(s) in column {index}", values.len());
    Ok(EmailColumn::new(values))
}

/// Cross-file comparison of two sets.
///
/// `duplicates` is the intersection; `unique_emails` holds every address
/// found in exactly one of the two sets.
pub fn deduplicate(first: &EmailSet, second: &EmailSet) -> DeduplicationReport {
    let duplicates = first.intersection(second);
    let unique_emails = first.union(second).difference(&duplicates);

    DeduplicationReport {
        duplicates,
        unique_emails,
    }
}

/// Compares two parsed columns under the given [`DuplicateScope`].
pub fn deduplicate_columns(
    first: &EmailColumn,
    second: &EmailColumn,
    scope: DuplicateScope,
) -> DeduplicationReport {
    match scope {
        DuplicateScope::CrossFile => deduplicate(&first.to_set(), &second.to_set()),
        DuplicateScope::AnyRepeat => {
            let mut occurrences: HashMap<&EmailRecord, usize> = HashMap::new();
            for email in first.iter().chain(second.iter()) {
                *occurrences.entry(email).or_default() += 1;
            }

            let (repeated, single): (Vec<_>, Vec<_>) =
                occurrences.into_iter().partition(|(_, count)| *count > 1);

            DeduplicationReport {
                duplicates: repeated.into_iter().map(|(email, _)| email.clone()).collect(),
                unique_emails: single.into_iter().map(|(email, _)| email.clone()).collect(),
            }
        }
    }
}

/// Parses both uploads, then deduplicates them.
///
/// Both files are checked for the email column before any comparison
/// happens; the first failure is returned and nothing else is computed.
pub fn deduplicate_csv(
    first_csv: &str,
    second_csv: &str,
    scope: DuplicateScope,
) -> Result<DeduplicationReport, ListCheckError> {
    let first = read_email_column(first_csv, UploadSlot::First)?;
    let second = read_email_column(second_csv, UploadSlot::Second)?;

    let report = deduplicate_columns(&first, &second, scope);
    info!(
        "Found {} duplicate email(s), {} unique email(s) ({:?})",
        report.duplicate_count(),
        report.unique_count(),
        scope
    );
    Ok(report)
}
