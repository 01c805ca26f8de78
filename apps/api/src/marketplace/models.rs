use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Declares a text-backed enum stored as a snake_case column.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(WorkMode, "work mode", {
    OnSite => "on_site",
    Hybrid => "hybrid",
    RemoteRegional => "remote_regional",
});

text_enum!(JobStatus, "job status", {
    Active => "active",
    Paused => "paused",
    Closed => "closed",
});

text_enum!(ApplicationStatus, "application status", {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
});

impl WorkMode {
    /// Label shown to candidates and embedded in match prompts.
    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::OnSite => "On-site",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::RemoteRegional => "Remote (SC)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: String,
    pub city: String,
    pub cep: Option<String>,
    #[sqlx(try_from = "String")]
    pub work_mode: WorkMode,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub requirements: Vec<String>,
    pub soft_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a posting. The store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: String,
    pub city: String,
    pub cep: Option<String>,
    pub work_mode: WorkMode,
    pub requirements: Vec<String>,
    pub soft_skills: Vec<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub city: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: Option<String>,
}

/// A professional actor as seen by the match engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub city: String,
    pub main_skill: String,
    pub canada_points: i32,
    pub bio: Option<String>,
    pub years_exp: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    #[sqlx(skip)]
    pub experiences: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyProfile {
    pub id: Uuid,
    pub full_name: String,
    pub city: String,
    pub culture: Option<String>,
}

/// Sign-up payload for a professional. `id` is the auth provider's user id.
#[derive(Debug, Clone)]
pub struct NewProfessional {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub city: String,
    pub cep: Option<String>,
    pub main_skill: String,
    pub bio: Option<String>,
    pub years_exp: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub experiences: Vec<ExperienceEntry>,
}

/// Sign-up payload for a company.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub city: String,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub cep: Option<String>,
    pub culture: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub professional_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    /// Mirror of `compatibility_details.score`; `None` until computed.
    pub match_score: Option<i32>,
    /// Last stored match snapshot, verbatim.
    pub compatibility_details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub professional_id: Uuid,
}

/// Application joined with the candidate columns the review screen shows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub candidate_name: String,
    pub candidate_city: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_mode_round_trips_through_text() {
        for mode in [WorkMode::OnSite, WorkMode::Hybrid, WorkMode::RemoteRegional] {
            assert_eq!(mode.as_str().parse::<WorkMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = JobStatus::try_from("archived".to_string()).unwrap_err();
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(WorkMode::RemoteRegional).unwrap(),
            "remote_regional"
        );
        assert_eq!(serde_json::to_value(ApplicationStatus::Pending).unwrap(), "pending");
    }

    #[test]
    fn test_remote_label_names_region() {
        assert_eq!(WorkMode::RemoteRegional.label(), "Remote (SC)");
    }
}
