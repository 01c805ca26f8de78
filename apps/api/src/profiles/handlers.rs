//! Axum route handlers for profile onboarding.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::models::{CandidateProfile, CompanyProfile};
use crate::profiles::extraction::{extract_resume, resolve_mime, ResumeExtraction};
use crate::profiles::registration::{self, RegisterCompanyRequest, RegisterProfessionalRequest};
use crate::state::AppState;

pub const RESUME_FIELD: &str = "file";

/// POST /api/v1/profiles/resume
///
/// Public: runs before sign-up to prefill the registration form. Multipart upload
/// with one `file` part; nothing is persisted.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeExtraction>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let mime = resolve_mime(field.content_type(), field.file_name())?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let extraction = extract_resume(
            state.completion.as_ref(),
            &state.config.resume_model,
            &data,
            &mime,
        )
        .await?;
        return Ok(Json(extraction));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{RESUME_FIELD}'"
    )))
}

/// POST /api/v1/profiles/professional
pub async fn handle_register_professional(
    actor: ActorContext,
    State(state): State<AppState>,
    Json(request): Json<RegisterProfessionalRequest>,
) -> Result<(StatusCode, Json<CandidateProfile>), AppError> {
    let candidate =
        registration::register_professional(state.store.as_ref(), &actor, request).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// POST /api/v1/profiles/company
pub async fn handle_register_company(
    actor: ActorContext,
    State(state): State<AppState>,
    Json(request): Json<RegisterCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyProfile>), AppError> {
    let company = registration::register_company(state.store.as_ref(), &actor, request).await?;
    Ok((StatusCode::CREATED, Json(company)))
}
