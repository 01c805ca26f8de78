//! Match Engine: pluggable scorer that rates one candidate against one posting.
//!
//! Default: `LlmMatchScorer` (structured completion with a response schema).
//! Alternative: `HeuristicMatchScorer` (deterministic, local; see `heuristic.rs`).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, chosen at startup from `MATCH_SCORER`.
//! A failed computation never falls back to another backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::with_json_rule;
use crate::llm_client::{CompletionError, CompletionRequest, Part, StructuredCompletion};
use crate::matching::models::MatchResult;
use crate::matching::payload::{encode, CandidatePayload, JobPayload};
use crate::matching::prompts::{build_match_prompt, MATCH_SYSTEM};
use crate::matching::schema::match_response_schema;
use crate::matching::validation::parse_match_response;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
///
/// On success every required field is present and every number is within 0..=100.
/// No side effects: persisting the result is the caller's decision.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    /// "llm" | "heuristic", for logs and responses.
    fn backend(&self) -> &'static str;

    async fn score(
        &self,
        job: &JobPayload,
        candidate: &CandidatePayload,
    ) -> Result<MatchResult, CompletionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmMatchScorer {
    completion: Arc<dyn StructuredCompletion>,
    model: String,
}

impl LlmMatchScorer {
    pub fn new(completion: Arc<dyn StructuredCompletion>, model: impl Into<String>) -> Self {
        Self {
            completion,
            model: model.into(),
        }
    }

    fn build_request(
        &self,
        job: &JobPayload,
        candidate: &CandidatePayload,
    ) -> Result<CompletionRequest, CompletionError> {
        let job_json = encode(job)
            .map_err(|e| CompletionError::InvalidResponse(format!("encode job: {e}")))?;
        let candidate_json = encode(candidate)
            .map_err(|e| CompletionError::InvalidResponse(format!("encode candidate: {e}")))?;

        Ok(CompletionRequest {
            model: self.model.clone(),
            system: Some(with_json_rule(MATCH_SYSTEM)),
            parts: vec![Part::text(build_match_prompt(&job_json, &candidate_json))],
            schema: match_response_schema(),
        })
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn score(
        &self,
        job: &JobPayload,
        candidate: &CandidatePayload,
    ) -> Result<MatchResult, CompletionError> {
        let request = self.build_request(job, candidate)?;

        let text = self.completion.complete(&request).await.map_err(|e| {
            warn!(model = %self.model, "match completion failed: {e}");
            CompletionError::from(e)
        })?;

        let result = parse_match_response(&text).inspect_err(|e| {
            warn!(model = %self.model, "match response rejected: {e}");
        })?;

        info!(
            model = %self.model,
            score = result.score,
            "match computed"
        );
        Ok(result)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
