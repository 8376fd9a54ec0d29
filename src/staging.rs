//! Ephemeral staging of an uploaded design image.
//!
//! The backend's file API takes a local path, so the request handler writes
//! the image to a uniquely named temp file, uploads it, and removes the local
//! copy immediately after the upload call. The remote handle lives until the
//! generate call has run, then [`StagedDesignFile::release`] deletes it.
//! Cleanup is best-effort and must run on every exit path; a `Drop` impl
//! backstops the local file in case a handler is abandoned mid-flight.

use crate::backend::{AnalysisBackend, BackendError, UploadedFile};
use rand::distr::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Length of the random temp-name prefix. Concurrent requests each draw their
/// own, so uniquely named paths stand in for locking.
const TEMP_NAME_RANDOM_LEN: usize = 12;

fn random_prefix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_NAME_RANDOM_LEN)
        .map(char::from)
        .collect()
}

/// Strip any directory components a client may have smuggled into the
/// uploaded filename; only the final component lands in the temp dir.
fn safe_file_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A design file staged for one generate call.
#[derive(Debug)]
pub struct StagedDesignFile {
    local_path: Option<PathBuf>,
    remote: Option<UploadedFile>,
}

impl StagedDesignFile {
    /// Write the image bytes to a uniquely named temp file, upload it, and
    /// remove the local copy. The local file's lifetime is strictly bounded
    /// to the upload call, whether it succeeds or fails.
    pub async fn stage(
        backend: &dyn AnalysisBackend,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<Self, BackendError> {
        let local_name = format!("{}{}", random_prefix(), safe_file_name(filename));
        let path = std::env::temp_dir().join(local_name);
        tokio::fs::write(&path, bytes).await?;

        let mut staged = Self {
            local_path: Some(path.clone()),
            remote: None,
        };

        let uploaded = backend.upload_file(&path, content_type).await;
        staged.remove_local().await;
        staged.remote = Some(uploaded?);
        Ok(staged)
    }

    /// The remote handle, if the upload succeeded.
    pub fn uploaded(&self) -> Option<&UploadedFile> {
        self.remote.as_ref()
    }

    /// Delete the remote handle (and any leftover local file). Best-effort:
    /// failures are logged, never surfaced to the caller.
    pub async fn release(mut self, backend: &dyn AnalysisBackend) {
        self.remove_local().await;
        if let Some(file) = self.remote.take() {
            if let Err(err) = backend.delete_file(&file).await {
                tracing::warn!(file = %file.name, error = %err, "failed to delete uploaded design file");
            }
        }
    }

    async fn remove_local(&mut self) {
        if let Some(path) = self.local_path.take() {
            if let Err(err) = tokio::fs::remove_file(&path).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %err, "failed to remove temp design file");
                }
            }
        }
    }
}

impl Drop for StagedDesignFile {
    fn drop(&mut self) {
        // Backstop for abandoned handlers. `release` has already taken the
        // path on every normal exit.
        if let Some(path) = self.local_path.take() {
            let _ = std::fs::remove_file(&path);
        }
    }
}
