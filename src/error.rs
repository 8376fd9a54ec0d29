use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback message for backend failures that carry no text of their own.
pub const GENERIC_BACKEND_MESSAGE: &str = "Error with server";

/// API error types
///
/// Input errors are the client's fault and short-circuit before any backend
/// call. Backend errors cover the single generate/upload/delete attempt and
/// the model returning something that is not the requested schema.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("htmlText is required")]
    HtmlTextRequired,

    #[error("Files are too large")]
    FilesTooLarge,

    #[error("designFile must be an image")]
    DesignFileNotImage,

    #[error("Invalid webAuditResults JSON")]
    InvalidAuditJson,

    #[error("Invalid webAuditResults structure")]
    InvalidAuditStructure,

    #[error("Field '{0}' is required")]
    MissingFormField(&'static str),

    #[error("Malformed multipart form: {0}")]
    MalformedForm(String),

    #[error("{0}")]
    Backend(String),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    /// Wrap a backend failure, substituting the generic fallback when the
    /// underlying error has no message.
    pub fn backend(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::Backend(GENERIC_BACKEND_MESSAGE.to_string())
        } else {
            ApiError::Backend(message)
        }
    }

    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::HtmlTextRequired
            | ApiError::FilesTooLarge
            | ApiError::DesignFileNotImage
            | ApiError::InvalidAuditJson
            | ApiError::InvalidAuditStructure
            | ApiError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingFormField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::HtmlTextRequired
            | ApiError::FilesTooLarge
            | ApiError::DesignFileNotImage
            | ApiError::InvalidAuditJson
            | ApiError::InvalidAuditStructure => "INVALID_INPUT",
            ApiError::MissingFormField(_) => "MISSING_FIELD",
            ApiError::MalformedForm(_) => "MALFORMED_FORM",
            ApiError::Backend(_) => "BACKEND_ERROR",
            ApiError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        for err in [
            ApiError::HtmlTextRequired,
            ApiError::FilesTooLarge,
            ApiError::DesignFileNotImage,
            ApiError::InvalidAuditJson,
            ApiError::InvalidAuditStructure,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn missing_form_field_maps_to_422() {
        let err = ApiError::MissingFormField("htmlText");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Field 'htmlText' is required");
    }

    #[test]
    fn backend_falls_back_to_generic_message() {
        assert_eq!(
            ApiError::backend("").to_string(),
            GENERIC_BACKEND_MESSAGE
        );
        assert_eq!(ApiError::backend("boom").to_string(), "boom");
    }
}
