use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::BytesMut;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::validation::{validate_fields, RawApplicantFields};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub message: String,
    pub application_id: Uuid,
}

/// Resume part buffered in memory until the text fields have been validated.
struct UploadedResume {
    file_name: String,
    content_type: Option<String>,
    contents: BytesMut,
}

/// POST /apply
///
/// validate fields → validate file → store file → persist record.
/// A record insert failure after the file was written leaves the file in place.
pub async fn handle_apply(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApplyResponse>, AppError> {
    let mut multipart = multipart?;
    let mut raw = RawApplicantFields::default();
    let mut resume: Option<UploadedResume> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == RESUME_FIELD {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let mut contents = BytesMut::new();
            // Fail as soon as the cap is crossed instead of buffering the whole body
            while let Some(chunk) = field.chunk().await? {
                state.policy.check_size(contents.len() + chunk.len())?;
                contents.extend_from_slice(&chunk);
            }
            resume = Some(UploadedResume {
                file_name,
                content_type,
                contents,
            });
        } else {
            let value = field.text().await?;
            if !raw.set(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    let fields = validate_fields(raw)?;

    let resume = resume
        .filter(|r| !r.file_name.is_empty() && !r.contents.is_empty())
        .ok_or_else(|| AppError::Validation("Resume file is required!".to_string()))?;
    state
        .policy
        .check_type(&resume.file_name, resume.content_type.as_deref())?;

    info!(file_name = %resume.file_name, bytes = resume.contents.len(), "Received resume");

    let stored = state
        .storage
        .persist(&resume.file_name, &resume.contents, Utc::now())
        .await?;

    let record = state
        .store
        .insert(fields.into_new_application(stored.resume_path))
        .await?;

    info!(
        application_id = %record.id,
        resume_path = %record.resume_path,
        path = %stored.path.display(),
        "Application recorded"
    );

    Ok(Json(ApplyResponse {
        success: true,
        message: "Application submitted successfully!".to_string(),
        application_id: record.id,
    }))
}
