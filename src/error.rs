use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Which of the two uploaded files an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    First,
    Second,
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSlot::First => f.write_str("first"),
            UploadSlot::Second => f.write_str("second"),
        }
    }
}

/// Request-level failures. Each one stops processing of the whole upload;
/// per-email check failures never end up here.
#[derive(Debug, Error)]
pub enum ListCheckError {
    #[error("CSV files must contain an 'Email' column! (missing in the {file} file)")]
    MissingColumn { file: UploadSlot },

    #[error("The {file} CSV file could not be parsed: {error}")]
    Csv {
        file: UploadSlot,
        #[source]
        error: csv::Error,
    },

    #[error("Failed to build the CSV download: {0}")]
    Export(String),
}

impl ListCheckError {
    pub fn code(&self) -> &'static str {
        match self {
            ListCheckError::MissingColumn { .. } => "MISSING_EMAIL_COLUMN",
            ListCheckError::Csv { .. } => "INVALID_CSV",
            ListCheckError::Export(_) => "EXPORT_ERROR",
        }
    }
}

impl ResponseError for ListCheckError {
    fn status_code(&self) -> StatusCode {
        match self {
            ListCheckError::MissingColumn { .. } | ListCheckError::Csv { .. } => {
                StatusCode::BAD_REQUEST
            }
            ListCheckError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_missing_column_message_names_the_file() {
        let error = ListCheckError::MissingColumn {
            file: UploadSlot::Second,
        };
        assert_eq!(error.code(), "MISSING_EMAIL_COLUMN");
        assert!(error.to_string().contains("second file"));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_export_error_is_a_server_error() {
        let error = ListCheckError::Export("disk full".to_string());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code(), "EXPORT_ERROR");
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let error = ListCheckError::MissingColumn {
            file: UploadSlot::First,
        };
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body_json["error"], "MISSING_EMAIL_COLUMN");
        assert!(
            body_json["message"]
                .as_str()
                .unwrap()
                .starts_with("CSV files must contain an 'Email' column!")
        );
    }
}
