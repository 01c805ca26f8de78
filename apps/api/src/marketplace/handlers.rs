//! Axum route handlers for postings, applications and the candidate dashboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::applications::{apply, ApplyOutcome};
use crate::marketplace::models::{JobPosting, JobUpdate};
use crate::marketplace::postings::{self, CreateJobRequest, PointsSummary, Recommendation};
use crate::marketplace::review::{self, Analysis, RankedApplication};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub q: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Postings
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    actor: ActorContext,
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let job = postings::create_job(state.store.as_ref(), &actor, request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?q=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let jobs = postings::list_active_jobs(state.store.as_ref(), query.q.as_deref()).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/mine
pub async fn handle_list_my_jobs(
    actor: ActorContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(
        postings::list_company_jobs(state.store.as_ref(), &actor).await?,
    ))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<JobPosting>, AppError> {
    let job = postings::update_job(state.store.as_ref(), &actor, job_id, update).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    postings::delete_job(state.store.as_ref(), &actor, job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:id/apply
///
/// A repeat submission answers 200 with `already_applied: true`.
pub async fn handle_apply(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApplyOutcome>, AppError> {
    actor.require_professional()?;
    let outcome = apply(
        state.store.as_ref(),
        &state.apply_settings(),
        job_id,
        actor.id,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_list_applications(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedApplication>>, AppError> {
    let ranked = review::list_ranked(
        state.store.as_ref(),
        &actor,
        job_id,
        &state.config.contact_phone,
    )
    .await?;
    Ok(Json(ranked))
}

/// POST /api/v1/applications/:id/match
pub async fn handle_compute_match(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Analysis>, AppError> {
    let analysis = review::compute_for_application(
        state.store.as_ref(),
        state.scorer.as_ref(),
        &actor,
        application_id,
    )
    .await?;
    Ok(Json(analysis))
}

/// GET /api/v1/applications/:id/analysis
pub async fn handle_get_analysis(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Analysis>, AppError> {
    let analysis = review::get_analysis(state.store.as_ref(), &actor, application_id).await?;
    Ok(Json(analysis))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate dashboard
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/me/recommendations
pub async fn handle_recommendations(
    actor: ActorContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    Ok(Json(
        postings::recommendations(state.store.as_ref(), &actor).await?,
    ))
}

/// GET /api/v1/me/points
pub async fn handle_points(
    actor: ActorContext,
    State(state): State<AppState>,
) -> Result<Json<PointsSummary>, AppError> {
    Ok(Json(
        postings::points_summary(state.store.as_ref(), &actor).await?,
    ))
}
