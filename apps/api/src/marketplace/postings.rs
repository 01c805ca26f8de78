//! Posting management and the candidate dashboard reads (recommendations, points).

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::models::{JobPosting, JobUpdate, NewJobPosting, WorkMode};
use crate::marketplace::store::MarketplaceStore;

pub const DEFAULT_SALARY: &str = "A combinar";
pub const POINTS_GOAL: i32 = 5000;

const RECOMMENDATION_POOL: i64 = 10;
const RECOMMENDATION_LIMIT: usize = 4;
const SAME_CITY_SCORE: u8 = 95;
const OTHER_CITY_SCORE: u8 = 78;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: Option<String>,
    pub city: String,
    #[serde(default)]
    pub cep: Option<String>,
    pub work_mode: WorkMode,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub job: JobPosting,
    /// Quick proximity score, not a computed match.
    pub match_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    pub points: i32,
    pub goal: i32,
    /// 0.0 – 100.0, capped.
    pub progress_percent: f64,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

pub async fn create_job(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    request: CreateJobRequest,
) -> Result<JobPosting, AppError> {
    actor.require_company()?;

    let salary = request
        .salary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SALARY.to_string());

    let job = store
        .insert_job(NewJobPosting {
            company_id: actor.id,
            title: required("title", &request.title)?,
            description: request.description.trim().to_string(),
            salary,
            city: required("city", &request.city)?,
            cep: request.cep.filter(|c| !c.trim().is_empty()),
            work_mode: request.work_mode,
            requirements: request.requirements,
            soft_skills: request.soft_skills,
        })
        .await?;

    info!(job_id = %job.id, company_id = %actor.id, "job posted");
    Ok(job)
}

pub async fn list_company_jobs(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
) -> Result<Vec<JobPosting>, AppError> {
    actor.require_company()?;
    Ok(store.list_jobs_by_company(actor.id).await?)
}

/// Active postings, newest first. `query` matches title or city, case-insensitively.
pub async fn list_active_jobs(
    store: &dyn MarketplaceStore,
    query: Option<&str>,
) -> Result<Vec<JobPosting>, AppError> {
    let jobs = store.list_active_jobs(None).await?;
    let Some(needle) = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) else {
        return Ok(jobs);
    };
    Ok(jobs
        .into_iter()
        .filter(|j| {
            j.title.to_lowercase().contains(&needle) || j.city.to_lowercase().contains(&needle)
        })
        .collect())
}

async fn owned_job(
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

pub async fn update_job(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    job_id: Uuid,
    update: JobUpdate,
) -> Result<JobPosting, AppError> {
    owned_job(store, actor, job_id).await?;

    if let Some(title) = &update.title {
        required("title", title)?;
    }
    if let Some(city) = &update.city {
        required("city", city)?;
    }

    store
        .update_job(job_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn delete_job(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    job_id: Uuid,
) -> Result<(), AppError> {
    owned_job(store, actor, job_id).await?;
    if !store.delete_job(job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!(%job_id, "job deleted");
    Ok(())
}

/// Up to four active postings, same-city first.
pub async fn recommendations(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
) -> Result<Vec<Recommendation>, AppError> {
    actor.require_professional()?;
    let candidate = store
        .get_candidate(actor.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", actor.id)))?;
    let home = candidate.city.trim().to_lowercase();

    let mut ranked: Vec<Recommendation> = store
        .list_active_jobs(Some(RECOMMENDATION_POOL))
        .await?
        .into_iter()
        .map(|job| {
            let match_score = if job.city.trim().to_lowercase() == home {
                SAME_CITY_SCORE
            } else {
                OTHER_CITY_SCORE
            };
            Recommendation { job, match_score }
        })
        .collect();

    // Stable: ties keep newest-first.
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked.truncate(RECOMMENDATION_LIMIT);
    Ok(ranked)
}

pub async fn points_summary(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
) -> Result<PointsSummary, AppError> {
    actor.require_professional()?;
    let points = store
        .get_points(actor.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", actor.id)))?;

    Ok(PointsSummary {
        points,
        goal: POINTS_GOAL,
        progress_percent: (f64::from(points) / f64::from(POINTS_GOAL) * 100.0).clamp(0.0, 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRole;
    use crate::marketplace::memory::MemoryStore;
    use crate::marketplace::models::JobStatus;

    fn company(id: Uuid) -> ActorContext {
        ActorContext {
            id,
            role: ActorRole::Company,
        }
    }

    fn professional(id: Uuid) -> ActorContext {
        ActorContext {
            id,
            role: ActorRole::Professional,
        }
    }

    fn request(title: &str, city: &str) -> CreateJobRequest {
        CreateJobRequest {
            title: title.to_string(),
            description: "Build the candidate portal".to_string(),
            salary: None,
            city: city.to_string(),
            cep: None,
            work_mode: WorkMode::Hybrid,
            requirements: vec!["React".to_string()],
            soft_skills: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_defaults_salary_and_is_active() {
        let store = MemoryStore::new();
        let acme = store.add_company("Acme", "Joinville");
        let job = create_job(
            &store,
            &company(acme.id),
            request("Frontend Developer", "Joinville"),
        )
        .await
        .unwrap();
        assert_eq!(job.salary, DEFAULT_SALARY);
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.company_id, acme.id);
    }

    #[tokio::test]
    async fn test_professional_cannot_post() {
        let store = MemoryStore::new();
        let err = create_job(
            &store,
            &professional(Uuid::new_v4()),
            request("Dev", "Joinville"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let store = MemoryStore::new();
        let acme = store.add_company("Acme", "Joinville");
        let err = create_job(&store, &company(acme.id), request("  ", "Joinville"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_only_owner_updates_and_deletes() {
        let store = MemoryStore::new();
        let acme = store.add_company("Acme", "Joinville");
        let job = store.add_job(acme.id, "Frontend Developer", "Joinville");
        let other = company(Uuid::new_v4());

        let update = JobUpdate {
            salary: Some("R$ 8.000".to_string()),
            ..Default::default()
        };
        assert!(update_job(&store, &other, job.id, update.clone()).await.is_err());
        let updated = update_job(&store, &company(acme.id), job.id, update).await.unwrap();
        assert_eq!(updated.salary, "R$ 8.000");

        assert!(delete_job(&store, &other, job.id).await.is_err());
        delete_job(&store, &company(acme.id), job.id).await.unwrap();
        assert!(store.get_job(job.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_active_listing_filters_by_title_or_city() {
        let store = MemoryStore::new();
        let acme = store.add_company("Acme", "Joinville");
        store.add_job(acme.id, "Frontend Developer", "Joinville");
        store.add_job(acme.id, "Data Engineer", "Florianópolis");

        assert_eq!(list_active_jobs(&store, None).await.unwrap().len(), 2);
        let by_city = list_active_jobs(&store, Some("floria")).await.unwrap();
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].title, "Data Engineer");
        let by_title = list_active_jobs(&store, Some("FRONTEND")).await.unwrap();
        assert_eq!(by_title.len(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_prefer_same_city_and_cap_at_four() {
        let store = MemoryStore::new();
        let acme = store.add_company("Acme", "Joinville");
        for i in 0..5 {
            store.add_job(acme.id, &format!("Remote role {i}"), "Blumenau");
        }
        let local = store.add_job(acme.id, "Frontend Developer", "Joinville");
        let ana = store.add_candidate("Ana Souza", "Joinville", "React");

        let recs = recommendations(&store, &professional(ana.id)).await.unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].job.id, local.id);
        assert_eq!(recs[0].match_score, 95);
        assert!(recs[1..].iter().all(|r| r.match_score == 78));
    }

    #[tokio::test]
    async fn test_points_progress_is_capped() {
        let store = MemoryStore::new();
        let ana = store.add_candidate("Ana Souza", "Joinville", "React");
        store.set_points(ana.id, 1250);
        let summary = points_summary(&store, &professional(ana.id)).await.unwrap();
        assert_eq!(summary.points, 1250);
        assert_eq!(summary.progress_percent, 25.0);

        store.set_points(ana.id, 11_250);
        let summary = points_summary(&store, &professional(ana.id)).await.unwrap();
        assert_eq!(summary.progress_percent, 100.0);
    }
}
