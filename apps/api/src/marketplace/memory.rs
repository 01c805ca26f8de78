//! In-memory `MarketplaceStore` for unit tests. Mirrors the Postgres constraints
//! the core relies on: unique (job, professional), unique profile ids, score-desc
//! ordering and the all-or-nothing application submit.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::marketplace::models::{
    Application, ApplicationListing, ApplicationStatus, CandidateProfile, CompanyProfile,
    JobPosting, JobStatus, JobUpdate, NewApplication, NewCompany, NewJobPosting,
    NewProfessional, WorkMode,
};
use crate::marketplace::store::{MarketplaceStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    jobs: Vec<JobPosting>,
    candidates: Vec<CandidateProfile>,
    companies: Vec<CompanyProfile>,
    applications: Vec<Application>,
}

impl Tables {
    fn has_profile(&self, id: Uuid) -> bool {
        self.candidates.iter().any(|c| c.id == id) || self.companies.iter().any(|c| c.id == id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_next_award: AtomicBool,
}

fn injected_failure() -> StoreError {
    StoreError::Database(sqlx::Error::Protocol("injected points failure".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_company(&self, full_name: &str, city: &str) -> CompanyProfile {
        let company = CompanyProfile {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            city: city.to_string(),
            culture: Some("Collaborative, hands-on team".to_string()),
        };
        self.tables.lock().unwrap().companies.push(company.clone());
        company
    }

    pub fn add_candidate(&self, full_name: &str, city: &str, main_skill: &str) -> CandidateProfile {
        let candidate = CandidateProfile {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            city: city.to_string(),
            main_skill: main_skill.to_string(),
            canada_points: 0,
            bio: None,
            years_exp: None,
            skills: None,
            projects: None,
            certifications: None,
            experiences: Vec::new(),
        };
        self.tables.lock().unwrap().candidates.push(candidate.clone());
        candidate
    }

    pub fn add_job(&self, company_id: Uuid, title: &str, city: &str) -> JobPosting {
        let job = JobPosting {
            id: Uuid::new_v4(),
            company_id,
            title: title.to_string(),
            description: format!("{title} position"),
            salary: "A combinar".to_string(),
            city: city.to_string(),
            cep: None,
            work_mode: WorkMode::OnSite,
            status: JobStatus::Active,
            requirements: Vec::new(),
            soft_skills: Vec::new(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().jobs.push(job.clone());
        job
    }

    /// Inserts an application directly, with no points awarded.
    pub fn add_application(&self, job_id: Uuid, professional_id: Uuid) -> Application {
        let row = Application {
            id: Uuid::new_v4(),
            job_id,
            professional_id,
            status: ApplicationStatus::Pending,
            match_score: None,
            compatibility_details: None,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().applications.push(row.clone());
        row
    }

    pub fn set_points(&self, professional_id: Uuid, points: i32) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(c) = tables.candidates.iter_mut().find(|c| c.id == professional_id) {
            c.canada_points = points;
        }
    }

    /// The next submit fails at the points step, as a dropped connection would.
    pub fn fail_next_award(&self) {
        self.fail_next_award.store(true, AtomicOrdering::SeqCst);
    }

    pub fn application_count(&self, job_id: Uuid, professional_id: Uuid) -> usize {
        self.tables
            .lock()
            .unwrap()
            .applications
            .iter()
            .filter(|a| a.job_id == job_id && a.professional_id == professional_id)
            .count()
    }
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn insert_job(&self, job: NewJobPosting) -> StoreResult<JobPosting> {
        let row = JobPosting {
            id: Uuid::new_v4(),
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            salary: job.salary,
            city: job.city,
            cep: job.cep,
            work_mode: job.work_mode,
            status: JobStatus::Active,
            requirements: job.requirements,
            soft_skills: job.soft_skills,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<JobPosting>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> StoreResult<Vec<JobPosting>> {
        let tables = self.tables.lock().unwrap();
        let mut jobs: Vec<_> = tables
            .jobs
            .iter()
            .filter(|j| j.company_id == company_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn list_active_jobs(&self, limit: Option<i64>) -> StoreResult<Vec<JobPosting>> {
        let tables = self.tables.lock().unwrap();
        let mut jobs: Vec<_> = tables
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Active)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            jobs.truncate(limit.max(0) as usize);
        }
        Ok(jobs)
    }

    async fn update_job(&self, id: Uuid, update: &JobUpdate) -> StoreResult<Option<JobPosting>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(job) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            job.title = title.clone();
        }
        if let Some(salary) = &update.salary {
            job.salary = salary.clone();
        }
        if let Some(mode) = update.work_mode {
            job.work_mode = mode;
        }
        if let Some(city) = &update.city {
            job.city = city.clone();
        }
        if let Some(description) = &update.description {
            job.description = description.clone();
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        tables.applications.retain(|a| a.job_id != id);
        Ok(tables.jobs.len() < before)
    }

    async fn get_candidate(&self, id: Uuid) -> StoreResult<Option<CandidateProfile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn get_company(&self, id: Uuid) -> StoreResult<Option<CompanyProfile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn register_professional(
        &self,
        professional: NewProfessional,
    ) -> StoreResult<CandidateProfile> {
        let mut tables = self.tables.lock().unwrap();
        if tables.has_profile(professional.id) {
            return Err(StoreError::Duplicate);
        }
        let candidate = CandidateProfile {
            id: professional.id,
            full_name: professional.full_name,
            city: professional.city,
            main_skill: professional.main_skill,
            canada_points: 0,
            bio: professional.bio,
            years_exp: professional.years_exp,
            skills: professional.skills,
            projects: professional.projects,
            certifications: professional.certifications,
            experiences: professional.experiences,
        };
        tables.candidates.push(candidate.clone());
        Ok(candidate)
    }

    async fn register_company(&self, company: NewCompany) -> StoreResult<CompanyProfile> {
        let mut tables = self.tables.lock().unwrap();
        if tables.has_profile(company.id) {
            return Err(StoreError::Duplicate);
        }
        let row = CompanyProfile {
            id: company.id,
            full_name: company.full_name,
            city: company.city,
            culture: company.culture,
        };
        tables.companies.push(row.clone());
        Ok(row)
    }

    async fn submit_application(
        &self,
        application: NewApplication,
        reward_points: i32,
    ) -> StoreResult<(Application, i32)> {
        let mut tables = self.tables.lock().unwrap();
        let exists = tables.applications.iter().any(|a| {
            a.job_id == application.job_id && a.professional_id == application.professional_id
        });
        if exists {
            return Err(StoreError::Duplicate);
        }
        // Nothing has been written yet, so failing here leaves both tables untouched.
        if self.fail_next_award.swap(false, AtomicOrdering::SeqCst) {
            return Err(injected_failure());
        }
        let Some(candidate) = tables
            .candidates
            .iter_mut()
            .find(|c| c.id == application.professional_id)
        else {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        };
        candidate.canada_points += reward_points;
        let total = candidate.canada_points;

        let row = Application {
            id: application.id,
            job_id: application.job_id,
            professional_id: application.professional_id,
            status: ApplicationStatus::Pending,
            match_score: None,
            compatibility_details: None,
            created_at: Utc::now(),
        };
        tables.applications.push(row.clone());
        Ok((row, total))
    }

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        professional_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.job_id == job_id && a.professional_id == professional_id)
            .cloned())
    }

    async fn list_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> StoreResult<Vec<ApplicationListing>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ApplicationListing> = tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| {
                let candidate = tables.candidates.iter().find(|c| c.id == a.professional_id);
                ApplicationListing {
                    application: a.clone(),
                    candidate_name: candidate.map(|c| c.full_name.clone()).unwrap_or_default(),
                    candidate_city: candidate.map(|c| c.city.clone()).unwrap_or_default(),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            match (a.application.match_score, b.application.match_score) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then(a.application.created_at.cmp(&b.application.created_at))
        });
        Ok(rows)
    }

    async fn store_match_snapshot(
        &self,
        application_id: Uuid,
        score: i32,
        details: &Value,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let Some(app) = tables.applications.iter_mut().find(|a| a.id == application_id) else {
            return Ok(false);
        };
        app.match_score = Some(score);
        app.compatibility_details = Some(details.clone());
        Ok(true)
    }

    async fn get_points(&self, professional_id: Uuid) -> StoreResult<Option<i32>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .candidates
            .iter()
            .find(|c| c.id == professional_id)
            .map(|c| c.canada_points))
    }
}
