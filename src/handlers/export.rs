use crate::error::ListCheckError;
use crate::models::email::EmailRecord;
use csv::Writer;

/// Header and attachment name of a single-column CSV download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDownload {
    pub header: &'static str,
    pub file_name: &'static str,
}

pub const UNIQUE_EMAILS: CsvDownload = CsvDownload {
    header: "Unique Emails",
    file_name: "unique_emails.csv",
};

pub const VALID_EMAILS: CsvDownload = CsvDownload {
    header: "Valid Emails",
    file_name: "valid_emails.csv",
};

/// Renders `emails` as UTF-8 CSV under the download's header row.
pub fn write_single_column<'a, I>(
    download: &CsvDownload,
    emails: I,
) -> Result<Vec<u8>, ListCheckError>
where
    I: IntoIterator<Item = &'a EmailRecord>,
{
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record([download.header])
        .map_err(|e| ListCheckError::Export(e.to_string()))?;
    for email in emails {
        writer
            .write_record([email.as_str()])
            .map_err(|e| ListCheckError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ListCheckError::Export(e.to_string()))
}
