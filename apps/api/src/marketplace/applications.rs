//! Application submission.
//!
//! One application per (posting, candidate). A repeat submission hits the unique
//! index and is reported as `already_applied`, not as an error. Points are awarded
//! only for the fresh insert, in the same store write as the insert itself.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::contact::{candidate_greeting, whatsapp_link};
use crate::marketplace::models::{Application, JobStatus, NewApplication};
use crate::marketplace::store::{MarketplaceStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub application: Application,
    pub already_applied: bool,
    pub points_awarded: i32,
    pub total_points: i32,
    /// Reopened on duplicates too, so the candidate can still reach the recruiter.
    pub contact_url: String,
}

/// Settings `apply` reads from `Config`.
#[derive(Debug, Clone)]
pub struct ApplySettings {
    pub reward_points: i32,
    pub contact_phone: String,
}

pub async fn apply(
    store: &dyn MarketplaceStore,
    settings: &ApplySettings,
    job_id: Uuid,
    professional_id: Uuid,
) -> Result<ApplyOutcome, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if job.status != JobStatus::Active {
        return Err(AppError::Validation(format!(
            "Job {job_id} is {} and no longer accepts applications",
            job.status
        )));
    }

    let candidate = store
        .get_candidate(professional_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {professional_id} not found")))?;

    let submitted = store
        .submit_application(
            NewApplication {
                id: Uuid::new_v4(),
                job_id,
                professional_id,
            },
            settings.reward_points,
        )
        .await;

    let (application, already_applied, points_awarded, total_points) = match submitted {
        Ok((application, total)) => {
            info!(
                application_id = %application.id,
                points = settings.reward_points,
                total,
                "application submitted"
            );
            (application, false, settings.reward_points, total)
        }
        Err(StoreError::Duplicate) => {
            info!(%job_id, %professional_id, "duplicate application ignored");
            let existing = store
                .find_application(job_id, professional_id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "duplicate reported but no application found for job {job_id}"
                    ))
                })?;
            (existing, true, 0, candidate.canada_points)
        }
        Err(e) => return Err(e.into()),
    };

    let contact_url = whatsapp_link(
        &settings.contact_phone,
        &candidate_greeting(&candidate.full_name, &job),
    )?;

    Ok(ApplyOutcome {
        application,
        already_applied,
        points_awarded,
        total_points,
        contact_url,
    })
}
