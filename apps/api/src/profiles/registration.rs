//! Sign-up records for both actor kinds.
//!
//! The auth provider has already created the user; its id arrives as the actor id.
//! Registration writes the shared profile row plus the role-specific record in one
//! store call, so a half-registered actor never exists.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::errors::AppError;
use crate::marketplace::models::{
    CandidateProfile, CompanyProfile, ExperienceEntry, NewCompany, NewProfessional,
};
use crate::marketplace::store::{MarketplaceStore, StoreError};

/// Used when a company address carries no recognizable city segment.
pub const DEFAULT_COMPANY_CITY: &str = "SC";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterProfessionalRequest {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub cep: Option<String>,
    pub main_skill: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub years_exp: Option<i32>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default)]
    pub experiences: Vec<ExperienceInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCompanyRequest {
    pub email: String,
    pub company_name: String,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    /// Free-form address, e.g. "Rua XV de Novembro, 100, Blumenau".
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Last comma-separated segment of the address.
pub fn city_from_location(location: Option<&str>) -> String {
    location
        .and_then(|l| l.rsplit(',').next())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COMPANY_CITY)
        .to_string()
}

fn already_registered(id: Uuid) -> impl FnOnce(StoreError) -> AppError {
    move |err| match err {
        StoreError::Duplicate => {
            AppError::Validation(format!("Profile {id} is already registered"))
        }
        other => other.into(),
    }
}

pub async fn register_professional(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    request: RegisterProfessionalRequest,
) -> Result<CandidateProfile, AppError> {
    actor.require_professional()?;

    if request.years_exp.is_some_and(|y| y < 0) {
        return Err(AppError::Validation("years_exp cannot be negative".to_string()));
    }

    // Entries without both role and company are form leftovers.
    let experiences: Vec<ExperienceEntry> = request
        .experiences
        .into_iter()
        .filter(|e| !e.role.trim().is_empty() && !e.company.trim().is_empty())
        .map(|e| ExperienceEntry {
            role: e.role.trim().to_string(),
            company: e.company.trim().to_string(),
            period: e.period.trim().to_string(),
            description: optional(e.description),
        })
        .collect();

    let candidate = store
        .register_professional(NewProfessional {
            id: actor.id,
            email: required("email", &request.email)?,
            full_name: required("full_name", &request.full_name)?,
            city: request.city.trim().to_string(),
            cep: optional(request.cep),
            main_skill: required("main_skill", &request.main_skill)?,
            bio: optional(request.bio),
            years_exp: request.years_exp,
            skills: request.skills,
            projects: request.projects,
            certifications: request.certifications,
            experiences,
        })
        .await
        .map_err(already_registered(actor.id))?;

    info!(
        professional_id = %candidate.id,
        experiences = candidate.experiences.len(),
        "professional registered"
    );
    Ok(candidate)
}

pub async fn register_company(
    store: &dyn MarketplaceStore,
    actor: &ActorContext,
    request: RegisterCompanyRequest,
) -> Result<CompanyProfile, AppError> {
    actor.require_company()?;

    let address = optional(request.location);
    let company = store
        .register_company(NewCompany {
            id: actor.id,
            email: required("email", &request.email)?,
            full_name: required("company_name", &request.company_name)?,
            city: city_from_location(address.as_deref()),
            cnpj: optional(request.cnpj),
            phone: optional(request.phone),
            cep: optional(request.cep),
            culture: optional(request.culture),
            address,
            bio: optional(request.bio),
        })
        .await
        .map_err(already_registered(actor.id))?;

    info!(company_id = %company.id, city = %company.city, "company registered");
    Ok(company)
}
