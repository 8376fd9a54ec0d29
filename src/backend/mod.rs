//! External LLM backend contract.
//!
//! The orchestrator depends on the [`AnalysisBackend`] trait only; the
//! concrete Gemini client lives in [`gemini`] and is injected through
//! [`crate::state::AppState`] at construction time, which keeps the request
//! pipeline testable with a counting mock.

pub mod gemini;

use async_trait::async_trait;
use std::path::Path;

pub use gemini::GeminiClient;

/// Opaque reference to a file previously uploaded to the backend's transient
/// storage, valid for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Backend-side resource name, e.g. `files/abc123`. Used for deletion.
    pub name: String,
    /// URI the generate call uses to reference the file.
    pub uri: String,
    pub mime_type: String,
}

/// One part of the content sequence sent to the generate call.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    File(UploadedFile),
}

/// Failures talking to the external backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("backend returned an empty completion")]
    EmptyCompletion,

    #[error("unexpected backend payload: {0}")]
    Payload(String),
}

/// Text+image-to-text generation service with transient file storage.
///
/// One generate attempt per request; retries and caching are the caller's
/// explicit non-goals.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run one generation over the ordered content parts and return the raw
    /// text completion.
    async fn generate_content(
        &self,
        model: &str,
        contents: &[ContentPart],
    ) -> Result<String, BackendError>;

    /// Upload a local file to transient storage and return its handle.
    async fn upload_file(
        &self,
        local_path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, BackendError>;

    /// Delete a previously uploaded file. Idempotence is not assumed; callers
    /// invoke this exactly once per handle.
    async fn delete_file(&self, file: &UploadedFile) -> Result<(), BackendError>;
}
