//! Application-level error type returned by every store, roster and HTTP
//! operation.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so callers
//! can pattern-match on a stable `kind` string, and rendered as an HTML error
//! page (with a status code per kind) through its [`IntoResponse`] impl.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Top-level error returned by group and member operations.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// A referenced group file or member does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The destination filename of a rename or copy is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Uploaded content, a filename, or a submitted form field is malformed.
    #[error("{0}")]
    InvalidFormat(String),

    /// A stored document could not be parsed. It is never overwritten by a
    /// mutation, since that would discard whatever is left of it.
    #[error("{0}")]
    Corrupt(String),

    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the system boundary so it remains serializable.
    #[error("{0}")]
    Io(String),

    /// The configuration file could not be read or is invalid.
    #[error("{0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
            Self::InvalidFormat(_) => "InvalidFormat",
            Self::Corrupt(_) => "Corrupt",
            Self::Io(_) => "Io",
            Self::Config(_) => "Config",
        }
    }
}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            Self::Corrupt(_) | Self::Io(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "request rejected");
        }
        let page = crate::views::pages::error_page(status, &self.to_string());
        (status, Html(page)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_serializes_to_kind_message() {
        let err = AppError::NotFound("File \"alpha.json\" not found".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::NotFound");
        assert_eq!(value["kind"], "NotFound");
        assert_eq!(value["message"], "File \"alpha.json\" not found");
    }

    #[test]
    fn conflict_serializes_to_kind_message() {
        let err = AppError::Conflict("File \"b.json\" already exists".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Conflict");
        assert_eq!(value["kind"], "Conflict");
        assert_eq!(value["message"], "File \"b.json\" already exists");
    }

    #[test]
    fn invalid_format_serializes_to_kind_message() {
        let err = AppError::InvalidFormat("Invalid JSON file".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::InvalidFormat");
        assert_eq!(value["kind"], "InvalidFormat");
        assert_eq!(value["message"], "Invalid JSON file");
    }

    #[test]
    fn corrupt_serializes_to_kind_message() {
        let err = AppError::Corrupt("expected value at line 1".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Corrupt");
        assert_eq!(value["kind"], "Corrupt");
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let errors = [
            AppError::NotFound(String::new()),
            AppError::Conflict(String::new()),
            AppError::InvalidFormat(String::new()),
            AppError::Corrupt(String::new()),
            AppError::Io(String::new()),
            AppError::Config(String::new()),
        ];
        for err in &errors {
            let value = serde_json::to_value(err).expect("serialize");
            assert_eq!(value["kind"], err.kind());
        }
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err = AppError::from(io_err);
        assert!(matches!(app_err, AppError::Io(_)));
        let value = serde_json::to_value(&app_err).expect("serialize");
        assert_eq!(value["kind"], "Io");
    }

    #[test]
    fn status_follows_kind() {
        assert_eq!(AppError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict(String::new()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidFormat(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Corrupt(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Io(String::new()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_response_renders_error_page_with_status() {
        let response = AppError::Conflict("File \"b.json\" already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let content_type = response.headers()[axum::http::header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[test]
    fn app_error_display_is_human_readable() {
        assert_eq!(
            AppError::NotFound("Member not found".to_string()).to_string(),
            "Member not found"
        );
        assert_eq!(
            AppError::Io("access denied".to_string()).to_string(),
            "access denied"
        );
    }
}
