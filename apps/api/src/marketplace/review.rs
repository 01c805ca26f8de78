//! Company review: ranked applications, on-demand match computation and stored analysis.
//!
//! Computing is user-triggered per application. A successful result overwrites the
//! previous snapshot whole; a failed one leaves the row untouched.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::contact::{company_greeting, whatsapp_link};
use crate::marketplace::models::{Application, CandidateProfile, JobPosting};
use crate::marketplace::store::MarketplaceStore;
use crate::matching::engine::MatchScorer;
use crate::matching::models::MatchResult;
use crate::matching::payload::{CandidatePayload, JobPayload};
use crate::matching::view::MatchView;

#[derive(Debug, Clone, Serialize)]
pub struct RankedApplication {
    pub application_id: Uuid,
    pub professional_id: Uuid,
    pub candidate_name: String,
    pub candidate_city: String,
    pub status: String,
    pub match_score: Option<i32>,
    /// Company-side WhatsApp greeting for this candidate.
    pub contact_url: String,
    /// Present once a snapshot has been computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<MatchView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub professional_id: Uuid,
    pub match_score: Option<i32>,
    pub result: Option<MatchResult>,
    pub view: Option<MatchView>,
}

/// Reads a stored snapshot. Empty objects and legacy shapes mean "not analysed yet".
pub fn parse_snapshot(details: Option<&Value>) -> Option<MatchResult> {
    let details = details?;
    if details.as_object().is_some_and(|o| o.is_empty()) {
        return None;
    }
    match serde_json::from_value::<MatchResult>(details.clone()) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("ignoring unreadable match snapshot: {e}");
            None
        }
    }
}

async fn load_owned_job(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    job_id: Uuid,
) -> Result<JobPosting, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    actor.require_owner(job.company_id)?;
    Ok(job)
}

async fn load_candidate(
    store: &dyn MarketplaceStore,
    professional_id: Uuid,
) -> Result<CandidateProfile, AppError> {
    store
        .get_candidate(professional_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {professional_id} not found")))
}

/// Encodes a posting (with its company's culture, when known) for the scorer.
pub async fn job_payload(
    store: &dyn MarketplaceStore,
    job: &JobPosting,
) -> Result<JobPayload, AppError> {
    let company = store.get_company(job.company_id).await?;
    Ok(JobPayload::from_posting(job, company.as_ref()))
}

pub async fn list_ranked(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    job_id: Uuid,
    contact_phone: &str,
) -> Result<Vec<RankedApplication>, AppError> {
    let job = load_owned_job(store, actor, job_id).await?;

    let rows = store.list_applications_for_job(job_id).await?;
    rows.into_iter()
        .map(|row| {
            let view = parse_snapshot(row.application.compatibility_details.as_ref())
                .as_ref()
                .map(MatchView::from);
            let contact_url =
                whatsapp_link(contact_phone, &company_greeting(&row.candidate_name, &job))?;
            Ok(RankedApplication {
                application_id: row.application.id,
                professional_id: row.application.professional_id,
                candidate_name: row.candidate_name,
                candidate_city: row.candidate_city,
                status: row.application.status.to_string(),
                match_score: row.application.match_score,
                contact_url,
                view,
            })
        })
        .collect()
}

async fn load_owned_application(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    application_id: Uuid,
) -> Result<(Application, JobPosting), AppError> {
    let application = store
        .get_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    let job = load_owned_job(store, actor, application.job_id).await?;
    Ok((application, job))
}

/// Scores the application's (posting, candidate) pair and replaces its snapshot.
pub async fn compute_for_application(
    store: &dyn MarketplaceStore,
    scorer: &dyn MatchScorer,
    actor: &ActorContext,
    application_id: Uuid,
) -> Result<Analysis, AppError> {
    let (application, job) = load_owned_application(store, actor, application_id).await?;
    let candidate = load_candidate(store, application.professional_id).await?;

    let result = scorer
        .score(&job_payload(store, &job).await?, &CandidatePayload::from(&candidate))
        .await?;

    let details = serde_json::to_value(&result)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize match result: {e}")))?;
    let score = i32::from(result.score);
    if !store
        .store_match_snapshot(application.id, score, &details)
        .await?
    {
        return Err(AppError::NotFound(format!(
            "Application {application_id} not found"
        )));
    }

    info!(
        %application_id,
        backend = scorer.backend(),
        score,
        "match snapshot stored"
    );

    Ok(Analysis {
        application_id: application.id,
        job_id: application.job_id,
        professional_id: application.professional_id,
        match_score: Some(score),
        view: Some(MatchView::from(&result)),
        result: Some(result),
    })
}

pub async fn get_analysis(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    application_id: Uuid,
) -> Result<Analysis, AppError> {
    let (application, _job) = load_owned_application(store, actor, application_id).await?;
    let result = parse_snapshot(application.compatibility_details.as_ref());

    Ok(Analysis {
        application_id: application.id,
        job_id: application.job_id,
        professional_id: application.professional_id,
        match_score: application.match_score,
        view: result.as_ref().map(MatchView::from),
        result,
    })
}

/// Ephemeral fit of one posting for the calling candidate. Nothing is stored.
pub async fn analyse_for_candidate(
    store: &dyn MarketplaceStore,
    scorer: &dyn MatchScorer,
    actor: &ActorContext,
    job_id: Uuid,
) -> Result<(MatchResult, MatchView), AppError> {
    actor.require_professional()?;
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let candidate = load_candidate(store, actor.id).await?;

    let result = scorer
        .score(&job_payload(store, &job).await?, &CandidatePayload::from(&candidate))
        .await?;
    let view = MatchView::from(&result);
    Ok((result, view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRole;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::llm_client::LlmError;
    use crate::marketplace::memory::MemoryStore;
    use crate::matching::engine::LlmMatchScorer;
    use crate::matching::heuristic::HeuristicMatchScorer;
    use serde_json::json;
    use std::sync::Arc;

    struct Fixture {
        store: MemoryStore,
        company: ActorContext,
        job_id: Uuid,
        application_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let company = store.add_company("TechFloripa", "Florianópolis");
        let job = store.add_job(company.id, "Frontend Developer", "Joinville");
        let ana = store.add_candidate("Ana Souza", "Joinville", "React");
        let application = store.add_application(job.id, ana.id);
        Fixture {
            store,
            company: ActorContext {
                id: company.id,
                role: ActorRole::Company,
            },
            job_id: job.id,
            application_id: application.id,
        }
    }

    fn completion_text(score: u8, tags: Vec<&str>) -> String {
        json!({
            "score": score,
            "status": "ok",
            "breakdown": {"tech": 80, "soft": 70, "culture": 60, "geo": 100},
            "behavioralTraits": [],
            "aiInsight": "insight",
            "yearsExp": 1,
            "skills": ["React"],
            "tags": tags,
            "pros": [],
            "cons": []
        })
        .to_string()
    }

    fn llm_scorer(text: String) -> LlmMatchScorer {
        LlmMatchScorer::new(Arc::new(ScriptedCompletion::text(text)), "gemini-test")
    }

    #[tokio::test]
    async fn test_compute_stores_snapshot_and_score() {
        let f = fixture().await;
        let scorer = llm_scorer(completion_text(88, vec!["React"]));

        let analysis = compute_for_application(&f.store, &scorer, &f.company, f.application_id)
            .await
            .unwrap();
        assert_eq!(analysis.match_score, Some(88));

        let stored = f.store.get_application(f.application_id).await.unwrap().unwrap();
        assert_eq!(stored.match_score, Some(88));
        assert_eq!(stored.compatibility_details.unwrap()["score"], 88);
    }

    #[tokio::test]
    async fn test_recompute_overwrites_without_merge() {
        let f = fixture().await;
        let first = llm_scorer(completion_text(88, vec!["React", "Senior"]));
        compute_for_application(&f.store, &first, &f.company, f.application_id)
            .await
            .unwrap();

        let second = llm_scorer(completion_text(41, vec![]));
        compute_for_application(&f.store, &second, &f.company, f.application_id)
            .await
            .unwrap();

        let analysis = get_analysis(&f.store, &f.company, f.application_id).await.unwrap();
        let result = analysis.result.unwrap();
        assert_eq!(result.score, 41);
        assert!(result.tags.is_empty());
        assert_eq!(analysis.view.unwrap().tags, vec!["Analysis required"]);
    }

    #[tokio::test]
    async fn test_failed_computation_stores_nothing() {
        let f = fixture().await;
        let scorer = LlmMatchScorer::new(
            Arc::new(ScriptedCompletion::failing(|| LlmError::Api {
                status: 500,
                message: "connection reset".to_string(),
            })),
            "gemini-test",
        );

        let err = compute_for_application(&f.store, &scorer, &f.company, f.application_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AiUpstream(_)));

        let stored = f.store.get_application(f.application_id).await.unwrap().unwrap();
        assert!(stored.match_score.is_none());
        assert!(stored.compatibility_details.is_none());
    }

    #[tokio::test]
    async fn test_other_company_cannot_compute() {
        let f = fixture().await;
        let intruder = ActorContext {
            id: Uuid::new_v4(),
            role: ActorRole::Company,
        };
        let err = compute_for_application(
            &f.store,
            &HeuristicMatchScorer,
            &intruder,
            f.application_id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_ranking_puts_unscored_last() {
        let f = fixture().await;
        let bruno = f.store.add_candidate("Bruno Lima", "Chapecó", "Vue");
        let second = f.store.add_application(f.job_id, bruno.id);
        compute_for_application(&f.store, &HeuristicMatchScorer, &f.company, second.id)
            .await
            .unwrap();

        let ranked = list_ranked(&f.store, &f.company, f.job_id, "5548999999999")
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].application_id, second.id);
        assert!(ranked[0].view.is_some());
        assert!(ranked[1].match_score.is_none());
        assert!(ranked[1].view.is_none());
        assert!(ranked[1].contact_url.contains("Ana"));
    }

    #[test]
    fn test_empty_legacy_snapshot_is_not_analysed() {
        assert!(parse_snapshot(Some(&json!({}))).is_none());
        assert!(parse_snapshot(Some(&json!({"score": 80}))).is_none());
        assert!(parse_snapshot(None).is_none());
    }

    #[tokio::test]
    async fn test_candidate_analysis_is_ephemeral() {
        let f = fixture().await;
        let carla = f.store.add_candidate("Carla Dias", "Joinville", "React");
        let actor = ActorContext {
            id: carla.id,
            role: ActorRole::Professional,
        };
        let (result, view) =
            analyse_for_candidate(&f.store, &HeuristicMatchScorer, &actor, f.job_id)
                .await
                .unwrap();
        assert_eq!(result.breakdown.geo, 100);
        assert_eq!(view.traits.len(), 4);
        assert_eq!(f.store.application_count(f.job_id, carla.id), 0);
    }
}
