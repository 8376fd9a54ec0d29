//! Gemini (Generative Language API) backend client.
//!
//! Speaks the v1beta REST surface over reqwest: `models/{model}:generateContent`
//! for completions, and the Files API (`upload/v1beta/files`, `v1beta/{name}`)
//! for transient image storage. Key-in-query style, matching the common API
//! samples.

use super::{AnalysisBackend, BackendError, ContentPart, UploadedFile};
use crate::config::AppConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
struct ReqPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<ReqFileData>,
}

#[derive(Debug, Serialize)]
struct ReqFileData {
    file_uri: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
struct ReqContent {
    parts: Vec<ReqPart>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<ReqContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: String,
}

/// Gemini client handle, cheap to clone (reqwest pools connections).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("gemini_api_key is not configured"))?;
        Ok(Self::new(api_key, Some(config.gemini_base_url.clone())))
    }

    async fn error_from_response(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        BackendError::Api { status, message }
    }
}

#[async_trait]
impl AnalysisBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        contents: &[ContentPart],
    ) -> Result<String, BackendError> {
        let parts = contents
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => ReqPart {
                    text: Some(text.clone()),
                    file_data: None,
                },
                ContentPart::File(file) => ReqPart {
                    text: None,
                    file_data: Some(ReqFileData {
                        file_uri: file.uri.clone(),
                        mime_type: file.mime_type.clone(),
                    }),
                },
            })
            .collect();

        let request = GenerateRequest {
            contents: vec![ReqContent { parts }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let response = self.http.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Payload(e.to_string()))?;

        // candidates[0].content.parts[*].text, newline-joined
        let mut out = String::new();
        if let Some(content) = body.candidates.first().and_then(|c| c.content.as_ref()) {
            for part in &content.parts {
                if let Some(text) = part.text.as_deref() {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
            }
        }
        if out.is_empty() {
            return Err(BackendError::EmptyCompletion);
        }
        Ok(out)
    }

    async fn upload_file(
        &self,
        local_path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, BackendError> {
        let bytes = tokio::fs::read(local_path).await?;

        let url = format!(
            "{}/upload/v1beta/files?key={}&uploadType=media",
            self.base_url, self.api_key
        );
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Payload(e.to_string()))?;

        let mime = if body.file.mime_type.is_empty() {
            mime_type.to_string()
        } else {
            body.file.mime_type
        };
        Ok(UploadedFile {
            name: body.file.name,
            uri: body.file.uri,
            mime_type: mime,
        })
    }

    async fn delete_file(&self, file: &UploadedFile) -> Result<(), BackendError> {
        // `file.name` is already the full resource path ("files/..").
        let url = format!("{}/v1beta/{}?key={}", self.base_url, file.name, self.api_key);
        let response = self.http.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
