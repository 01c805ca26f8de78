//! Data access for postings, profiles and applications.
//!
//! Handlers depend on `Arc<dyn MarketplaceStore>`; `PgStore` is the Postgres backend.
//! Writes are last-writer-wins. Nothing here uses optimistic concurrency.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::marketplace::models::{
    Application, ApplicationListing, CandidateProfile, CompanyProfile, ExperienceEntry,
    JobPosting, JobStatus, JobUpdate, NewApplication, NewCompany, NewJobPosting,
    NewProfessional,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The insert hit a unique index. Distinguishable from every other failure.
    #[error("duplicate key")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    fn from_insert(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            StoreError::Duplicate
        } else {
            StoreError::Database(err)
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting>;
    async fn get_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>>;
    /// Newest first.
    async fn list_jobs_by_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPosting>>;
    /// Active postings, newest first.
    async fn list_active_jobs(&self, limit: Option<i64>) -> StoreResult<Vec<JobPosting>>;
    async fn update_job(&self, id: Uuid, update: &JobUpdate) -> StoreResult<Option<JobPosting>>;
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;

    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<CandidateProfile>>;
    async fn get_company(&self, id: Uuid) -> StoreResult<Option<CompanyProfile>>;
    /// Profile, professional record (points start at 0) and experiences in one
    /// transaction. An existing id fails with `StoreError::Duplicate`.
    async fn register_professional(
        &self,
        professional: NewProfessional,
    ) -> StoreResult<CandidateProfile>;
    async fn register_company(&self, company: NewCompany) -> StoreResult<CompanyProfile>;

    /// Inserts the application and adds `reward_points` to the candidate's counter
    /// as one unit, returning the new total. Fails with `StoreError::Duplicate` when
    /// the (job, professional) pair exists; on any failure neither write persists.
    async fn submit_application(
        &self,
        application: NewApplication,
        reward_points: i32,
    ) -> StoreResult<(Application, i32)>;
    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>>;
    async fn find_application(
        &self,
        job_id: Uuid,
        professional_id: Uuid,
    ) -> StoreResult<Option<Application>>;
    /// Ordered by match score descending; unscored rows last.
    async fn list_applications_for_job(&self, job_id: Uuid)
        -> StoreResult<Vec<ApplicationListing>>;
    /// Replaces score and snapshot entirely. Returns false when the row is gone.
    async fn store_match_snapshot(
        &self,
        application_id: Uuid,
        score: i32,
        details: &Value,
    ) -> StoreResult<bool>;

    async fn get_points(&self, professional_id: Uuid) -> StoreResult<Option<i32>>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const JOB_COLUMNS: &str = "id, company_id, title, description, salary, city, cep, work_mode, \
     status, requirements, soft_skills, created_at";

async fn insert_profile(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    email: &str,
    full_name: &str,
    user_type: &str,
    city: &str,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO profiles (id, email, full_name, user_type, city) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(email)
    .bind(full_name)
    .bind(user_type)
    .bind(city)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::from_insert)?;
    Ok(())
}

const APPLICATION_COLUMNS: &str =
    "id, job_id, professional_id, status, match_score, compatibility_details, created_at";

#[async_trait]
impl MarketplaceStore for PgStore {
    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting> {
        let row = sqlx::query_as::<_, JobPosting>(&format!(
            r#"
            INSERT INTO jobs
                (company_id, title, description, salary, city, cep, work_mode,
                 status, requirements, soft_skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job.company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.salary)
        .bind(&job.city)
        .bind(&job.cep)
        .bind(job.work_mode.as_str())
        .bind(JobStatus::Active.as_str())
        .bind(&job.requirements)
        .bind(&job.soft_skills)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_insert)?;

        debug!("Inserted job {} for company {}", row.id, row.company_id);
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>> {
        Ok(
            sqlx::query_as::<_, JobPosting>(&format!(
                "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?,
        )
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPosting>> {
        Ok(sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE company_id = $1 ORDER BY created_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_active_jobs(&self, limit: Option<i64>) -> StoreResult<Vec<JobPosting>> {
        Ok(sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE status = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(JobStatus::Active.as_str())
        // LIMIT NULL means no limit in Postgres
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_job(&self, id: Uuid, update: &JobUpdate) -> StoreResult<Option<JobPosting>> {
        Ok(sqlx::query_as::<_, JobPosting>(&format!(
            r#"
            UPDATE jobs SET
                title       = COALESCE($2, title),
                salary      = COALESCE($3, salary),
                work_mode   = COALESCE($4, work_mode),
                city        = COALESCE($5, city),
                description = COALESCE($6, description),
                status      = COALESCE($7, status)
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.salary)
        .bind(update.work_mode.map(|m| m.as_str()))
        .bind(&update.city)
        .bind(&update.description)
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<CandidateProfile>> {
        let candidate = sqlx::query_as::<_, CandidateProfile>(
            r#"
            SELECT p.id, p.full_name, p.city, pr.main_skill, pr.canada_points, pr.bio,
                   pr.years_exp, pr.skills, pr.projects, pr.certifications
            FROM profiles p
            JOIN professionals pr ON pr.id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut candidate) = candidate else {
            return Ok(None);
        };

        candidate.experiences = sqlx::query_as::<_, ExperienceEntry>(
            r#"
            SELECT role, company, period, description
            FROM experiences
            WHERE professional_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(candidate))
    }

    async fn get_company(&self, id: Uuid) -> StoreResult<Option<CompanyProfile>> {
        Ok(sqlx::query_as::<_, CompanyProfile>(
            r#"
            SELECT p.id, p.full_name, p.city, c.culture
            FROM profiles p
            JOIN companies c ON c.id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn register_professional(
        &self,
        professional: NewProfessional,
    ) -> StoreResult<CandidateProfile> {
        let p = professional;

        let mut tx = self.pool.begin().await?;
        insert_profile(&mut tx, p.id, &p.email, &p.full_name, "professional", &p.city).await?;

        sqlx::query(
            r#"
            INSERT INTO professionals
                (id, cep, main_skill, canada_points, bio, years_exp, skills, projects,
                 certifications)
            VALUES ($1, $2, $3, 0, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(p.id)
        .bind(&p.cep)
        .bind(&p.main_skill)
        .bind(&p.bio)
        .bind(p.years_exp)
        .bind(&p.skills)
        .bind(&p.projects)
        .bind(&p.certifications)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from_insert)?;

        // clock_timestamp keeps entry order; now() is fixed for the whole transaction
        for entry in &p.experiences {
            sqlx::query(
                r#"
                INSERT INTO experiences
                    (professional_id, role, company, period, description, created_at)
                VALUES ($1, $2, $3, $4, $5, clock_timestamp())
                "#,
            )
            .bind(p.id)
            .bind(&entry.role)
            .bind(&entry.company)
            .bind(&entry.period)
            .bind(&entry.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            "Registered professional {} with {} experiences",
            p.id,
            p.experiences.len()
        );

        Ok(CandidateProfile {
            id: p.id,
            full_name: p.full_name,
            city: p.city,
            main_skill: p.main_skill,
            canada_points: 0,
            bio: p.bio,
            years_exp: p.years_exp,
            skills: p.skills,
            projects: p.projects,
            certifications: p.certifications,
            experiences: p.experiences,
        })
    }

    async fn register_company(&self, company: NewCompany) -> StoreResult<CompanyProfile> {
        let c = company;
        let mut tx = self.pool.begin().await?;
        insert_profile(&mut tx, c.id, &c.email, &c.full_name, "company", &c.city).await?;

        sqlx::query(
            r#"
            INSERT INTO companies (id, cnpj, phone, cep, culture, address, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(c.id)
        .bind(&c.cnpj)
        .bind(&c.phone)
        .bind(&c.cep)
        .bind(&c.culture)
        .bind(&c.address)
        .bind(&c.bio)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::from_insert)?;

        tx.commit().await?;
        debug!("Registered company {}", c.id);

        Ok(CompanyProfile {
            id: c.id,
            full_name: c.full_name,
            city: c.city,
            culture: c.culture,
        })
    }

    async fn submit_application(
        &self,
        application: NewApplication,
        reward_points: i32,
    ) -> StoreResult<(Application, i32)> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on an early return rolls the insert back.
        let row = sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO applications (id, job_id, professional_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.professional_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::from_insert)?;

        let total = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE professionals SET canada_points = canada_points + $2
            WHERE id = $1
            RETURNING canada_points
            "#,
        )
        .bind(application.professional_id)
        .bind(reward_points)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(
            "Inserted application {} and awarded {} points (total {})",
            row.id, reward_points, total
        );
        Ok((row, total))
    }

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        professional_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        Ok(sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 AND professional_id = $2"
        ))
        .bind(job_id)
        .bind(professional_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> StoreResult<Vec<ApplicationListing>> {
        Ok(sqlx::query_as::<_, ApplicationListing>(
            r#"
            SELECT a.id, a.job_id, a.professional_id, a.status, a.match_score,
                   a.compatibility_details, a.created_at,
                   p.full_name AS candidate_name, p.city AS candidate_city
            FROM applications a
            JOIN profiles p ON p.id = a.professional_id
            WHERE a.job_id = $1
            ORDER BY a.match_score DESC NULLS LAST, a.created_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn store_match_snapshot(
        &self,
        application_id: Uuid,
        score: i32,
        details: &Value,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE applications SET match_score = $2, compatibility_details = $3 WHERE id = $1",
        )
        .bind(application_id)
        .bind(score)
        .bind(details)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_points(&self, professional_id: Uuid) -> StoreResult<Option<i32>> {
        Ok(
            sqlx::query_scalar::<_, i32>(
                "SELECT canada_points FROM professionals WHERE id = $1",
            )
            .bind(professional_id)
            .fetch_optional(&self.pool)
            .await?,
        )
    }
}
