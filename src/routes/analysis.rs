//! The webpage-analysis endpoint.
//!
//! Single pass per request, no retries:
//! read form → validate → build prompt → stage design file (if any) →
//! generate → parse reply → cleanup. Cleanup of the staged file runs before
//! the outcome is returned, on success and on failure alike.

use crate::backend::{AnalysisBackend, BackendError, ContentPart};
use crate::error::{ApiError, ApiResult};
use crate::prompt::build_prompt;
use crate::schema::{parse_analysis, AnalysisResponse};
use crate::staging::StagedDesignFile;
use crate::state::AppState;
use crate::validate::{validate_request, DesignUpload, RawAnalysisForm};
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;

/// Collect the multipart fields into a raw form. Unknown parts are skipped;
/// the design file blob is consumed exactly once.
async fn read_analysis_form(mut multipart: Multipart) -> ApiResult<RawAnalysisForm> {
    let mut form = RawAnalysisForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::MalformedForm(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "htmlText" => {
                form.html_text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::MalformedForm(e.to_string()))?,
                );
            }
            "specification" => {
                form.specification = field
                    .text()
                    .await
                    .map_err(|e| ApiError::MalformedForm(e.to_string()))?;
            }
            "webAuditResults" => {
                form.web_audit_results = field
                    .text()
                    .await
                    .map_err(|e| ApiError::MalformedForm(e.to_string()))?;
            }
            "designFile" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let filename = field.file_name().unwrap_or("designFile").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::MalformedForm(e.to_string()))?;
                form.design_file = Some(DesignUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    filename,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// One generate attempt plus schema validation of the reply.
async fn execute_analysis(
    backend: &dyn AnalysisBackend,
    model: &str,
    contents: &[ContentPart],
) -> Result<AnalysisResponse, BackendError> {
    let raw = backend.generate_content(model, contents).await?;
    parse_analysis(&raw)
        .map_err(|e| BackendError::Payload(format!("model reply is not valid analysis JSON: {e}")))
}

/// POST /webpage-analysis
///
/// Accepts a multipart form (`htmlText` required; `specification`,
/// `webAuditResults`, `designFile` optional) and returns the validated
/// [`AnalysisResponse`]. Input errors surface as 400/422 before any backend
/// call; backend and parse failures surface once as 500.
pub async fn webpage_analysis(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<AnalysisResponse>> {
    let form = read_analysis_form(multipart).await?;
    let request = validate_request(form, &state.config)?;

    let prompt = build_prompt(
        &request.html_text,
        &request.specification,
        request.design_file.is_some(),
        &request.web_audit_results,
    );
    let mut contents = vec![ContentPart::Text(prompt)];

    let staged = match &request.design_file {
        Some(design) => {
            let staged = StagedDesignFile::stage(
                state.backend.as_ref(),
                &design.bytes,
                &design.filename,
                &design.content_type,
            )
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "design file staging failed");
                ApiError::backend(err.to_string())
            })?;
            if let Some(uploaded) = staged.uploaded() {
                contents.push(ContentPart::File(uploaded.clone()));
            }
            Some(staged)
        }
        None => None,
    };

    let outcome = execute_analysis(state.backend.as_ref(), &state.config.model, &contents).await;

    // Cleanup runs before the outcome is inspected so error paths release the
    // uploaded handle too.
    if let Some(staged) = staged {
        staged.release(state.backend.as_ref()).await;
    }

    let response = outcome.map_err(|err| {
        tracing::error!(error = %err, "webpage analysis failed");
        ApiError::backend(err.to_string())
    })?;

    Ok(Json(response))
}
