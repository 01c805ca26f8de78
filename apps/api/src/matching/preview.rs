//! Ad-hoc match between a posting and a profile supplied in the request.
//!
//! Either side may be a JSON record (any fields, unknown ones included) or plain
//! text. Nothing is read from or written to the store.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::engine::MatchScorer;
use crate::matching::models::MatchResult;
use crate::matching::payload::{CandidatePayload, JobPayload};
use crate::matching::view::MatchView;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PreviewInput<T> {
    Text(String),
    Record(T),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub job: PreviewInput<JobPayload>,
    pub candidate: PreviewInput<CandidatePayload>,
}

impl PreviewInput<JobPayload> {
    fn into_payload(self) -> JobPayload {
        match self {
            PreviewInput::Text(text) => JobPayload::from_text(&text),
            PreviewInput::Record(record) => record,
        }
    }
}

impl PreviewInput<CandidatePayload> {
    fn into_payload(self) -> CandidatePayload {
        match self {
            PreviewInput::Text(text) => CandidatePayload::from_text(&text),
            PreviewInput::Record(record) => record,
        }
    }
}

pub async fn preview_match(
    scorer: &dyn MatchScorer,
    request: PreviewRequest,
) -> Result<(MatchResult, MatchView), AppError> {
    let job = request.job.into_payload();
    let candidate = request.candidate.into_payload();
    if job == JobPayload::default() || candidate == CandidatePayload::default() {
        return Err(AppError::Validation(
            "Both job and candidate need some content to compare".to_string(),
        ));
    }

    let result = scorer.score(&job, &candidate).await?;
    info!(score = result.score, backend = scorer.backend(), "match preview computed");
    let view = MatchView::from(&result);
    Ok((result, view))
}
