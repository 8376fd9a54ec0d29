//! Input validation for the webpage-analysis form.
//!
//! Rules run in a fixed order and the first failure wins, so callers get the
//! same rejection reason for the same bad input regardless of what else is
//! wrong. All checks are pure; nothing here touches the backend.

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use serde_json::Value;

/// The four audit keys a non-empty `webAuditResults` object must carry.
pub const REQUIRED_AUDIT_KEYS: [&str; 4] = [
    "axeCoreResult",
    "pageSpeedResult",
    "nuValidatorResult",
    "responsivenessResult",
];

/// Uploaded design image, consumed from the multipart stream exactly once.
#[derive(Debug, Clone)]
pub struct DesignUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Raw form fields as read off the wire, before any validation.
///
/// `html_text` stays optional here: a form with the part entirely absent is a
/// malformed request (422), distinct from a present-but-empty value (400).
#[derive(Debug, Default)]
pub struct RawAnalysisForm {
    pub html_text: Option<String>,
    pub specification: String,
    pub web_audit_results: String,
    pub design_file: Option<DesignUpload>,
}

/// A validated analysis request, request-scoped and never persisted.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub html_text: String,
    pub specification: String,
    pub web_audit_results: String,
    pub design_file: Option<DesignUpload>,
}

/// Validate the raw form against the configured limits.
///
/// Check order (first match wins):
/// 1. `htmlText` part absent → 422
/// 2. `htmlText` empty → "htmlText is required"
/// 3. combined text size over limit → "Files are too large"
/// 4. design file over limit → "Files are too large"
/// 5. design file not an image → "designFile must be an image"
/// 6. `webAuditResults` unparseable → "Invalid webAuditResults JSON";
///    parseable but missing required keys → "Invalid webAuditResults structure"
pub fn validate_request(form: RawAnalysisForm, config: &AppConfig) -> ApiResult<AnalysisRequest> {
    let html_text = form
        .html_text
        .ok_or(ApiError::MissingFormField("htmlText"))?;
    if html_text.is_empty() {
        return Err(ApiError::HtmlTextRequired);
    }

    let combined_len =
        html_text.len() + form.specification.len() + form.web_audit_results.len();
    if combined_len > config.max_combined_input_bytes {
        return Err(ApiError::FilesTooLarge);
    }

    if let Some(design) = &form.design_file {
        if design.bytes.len() > config.max_design_file_bytes {
            return Err(ApiError::FilesTooLarge);
        }
        if !design.content_type.starts_with("image/") {
            return Err(ApiError::DesignFileNotImage);
        }
    }

    if !form.web_audit_results.is_empty() {
        let parsed: Value = serde_json::from_str(&form.web_audit_results)
            .map_err(|_| ApiError::InvalidAuditJson)?;
        let object = parsed.as_object().ok_or(ApiError::InvalidAuditStructure)?;
        if !REQUIRED_AUDIT_KEYS.iter().all(|key| object.contains_key(*key)) {
            return Err(ApiError::InvalidAuditStructure);
        }
    }

    Ok(AnalysisRequest {
        html_text,
        specification: form.specification,
        web_audit_results: form.web_audit_results,
        design_file: form.design_file,
    })
}
