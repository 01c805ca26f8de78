//! Axum route handlers for the Match API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::review::analyse_for_candidate;
use crate::matching::models::MatchResult;
use crate::matching::preview::{preview_match, PreviewRequest};
use crate::matching::view::MatchView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: Uuid,
    pub result: MatchResult,
    pub view: MatchView,
    pub scorer_backend: &'static str, // "llm" | "heuristic"
}

/// POST /api/v1/jobs/:id/match
///
/// Fit of a posting for the calling professional. The result is not stored.
pub async fn handle_match_job(
    actor: ActorContext,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MatchResponse>, AppError> {
    let (result, view) =
        analyse_for_candidate(state.store.as_ref(), state.scorer.as_ref(), &actor, job_id)
            .await?;

    Ok(Json(MatchResponse {
        job_id,
        result,
        view,
        scorer_backend: state.scorer.backend(),
    }))
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub result: MatchResult,
    pub view: MatchView,
    pub scorer_backend: &'static str,
}

/// POST /api/v1/match/preview
///
/// Public. Scores the posting and profile given in the body; nothing is stored.
pub async fn handle_match_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let (result, view) = preview_match(state.scorer.as_ref(), request).await?;
    Ok(Json(PreviewResponse {
        result,
        view,
        scorer_backend: state.scorer.backend(),
    }))
}
