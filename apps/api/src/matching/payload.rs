//! Encode step between stored records and the match prompt.
//!
//! Both payloads are partial records: absent or empty fields are skipped rather than
//! sent as empty strings, and nothing here validates shape. Fields this module does
//! not know are kept in `extra` and serialized alongside the known ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::marketplace::models::{CandidateProfile, CompanyProfile, ExperienceEntry, JobPosting};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_culture: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    pub role: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_exp: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experiences: Vec<ExperiencePayload>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_blank_opt(s: Option<&str>) -> Option<String> {
    s.and_then(non_blank)
}

fn non_blank_list(items: &[String]) -> Vec<String> {
    items.iter().filter_map(|s| non_blank(s)).collect()
}

impl JobPayload {
    pub fn from_posting(job: &JobPosting, company: Option<&CompanyProfile>) -> Self {
        Self {
            title: non_blank(&job.title),
            description: non_blank(&job.description),
            salary: non_blank(&job.salary),
            city: non_blank(&job.city),
            work_mode: Some(job.work_mode.label().to_string()),
            requirements: non_blank_list(&job.requirements),
            soft_skills: non_blank_list(&job.soft_skills),
            company_culture: company.and_then(|c| non_blank_opt(c.culture.as_deref())),
            extra: Map::new(),
        }
    }

    /// A posting pasted as plain text.
    pub fn from_text(text: &str) -> Self {
        Self {
            description: non_blank(text),
            ..Default::default()
        }
    }
}

impl From<&ExperienceEntry> for ExperiencePayload {
    fn from(e: &ExperienceEntry) -> Self {
        Self {
            role: e.role.trim().to_string(),
            company: e.company.trim().to_string(),
            period: non_blank(&e.period),
            description: non_blank_opt(e.description.as_deref()),
        }
    }
}

impl From<&CandidateProfile> for CandidatePayload {
    fn from(c: &CandidateProfile) -> Self {
        Self {
            full_name: non_blank(&c.full_name),
            city: non_blank(&c.city),
            main_skill: non_blank(&c.main_skill),
            bio: non_blank_opt(c.bio.as_deref()),
            years_exp: c.years_exp,
            skills: non_blank_list(c.skills.as_deref().unwrap_or_default()),
            projects: non_blank_list(c.projects.as_deref().unwrap_or_default()),
            certifications: non_blank_list(c.certifications.as_deref().unwrap_or_default()),
            experiences: c.experiences.iter().map(ExperiencePayload::from).collect(),
            extra: Map::new(),
        }
    }
}

impl CandidatePayload {
    /// A profile or resume pasted as plain text.
    pub fn from_text(text: &str) -> Self {
        Self {
            bio: non_blank(text),
            ..Default::default()
        }
    }
}

/// Serializes a payload for embedding in a prompt.
pub fn encode<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(payload)
}
