//! Deterministic local scorer. Same rubric as the LLM prompt, computed numerically.
//!
//! Components (each 0–100):
//! - tech: every requirement is matched against the candidate's skills
//!   (exact, case-insensitive → 1.0) or free text (substring → 0.6)
//! - experience: years of experience and listed roles
//! - projects / certifications: amount of cited evidence
//! - soft: overlap between posting soft skills and candidate text
//! - culture: company culture keywords found in the candidate's bio
//! - geo: same city 100, regional remote 80, elsewhere 30
//!
//! Overall = 0.40 × avg(tech, experience) + 0.25 × projects + 0.15 × certifications
//!         + 0.10 × avg(soft, culture) + 0.10 × geo

use async_trait::async_trait;

use crate::llm_client::CompletionError;
use crate::marketplace::models::WorkMode;
use crate::matching::engine::MatchScorer;
use crate::matching::models::{Breakdown, MatchResult};
use crate::matching::payload::{CandidatePayload, JobPayload};

const EXACT_MATCH: f64 = 1.0;
const TEXT_MATCH: f64 = 0.6;
const NEUTRAL: f64 = 50.0;

pub struct HeuristicMatchScorer;

#[async_trait]
impl MatchScorer for HeuristicMatchScorer {
    fn backend(&self) -> &'static str {
        "heuristic"
    }

    async fn score(
        &self,
        job: &JobPayload,
        candidate: &CandidatePayload,
    ) -> Result<MatchResult, CompletionError> {
        Ok(compute_heuristic_match(job, candidate))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

struct TechFit {
    score: f64,
    matched: Vec<String>,
    missing: Vec<String>,
}

pub fn compute_heuristic_match(job: &JobPayload, candidate: &CandidatePayload) -> MatchResult {
    let skills = candidate_skills(candidate);
    let text = candidate_text(candidate);

    let tech = tech_fit(&job.requirements, &skills, &text);
    let experience = experience_score(candidate);
    let projects = evidence_score(candidate.projects.len(), 34.0);
    let certifications = evidence_score(candidate.certifications.len(), 50.0);
    let soft = soft_score(&job.soft_skills, &skills, &text);
    let culture = culture_score(job.company_culture.as_deref(), candidate.bio.as_deref());
    let geo = geo_score(job, candidate);

    let overall = 0.40 * (tech.score + experience) / 2.0
        + 0.25 * projects
        + 0.15 * certifications
        + 0.10 * (soft + culture) / 2.0
        + 0.10 * geo;
    let score = clamp(overall);

    let status = if score >= 80 {
        "Strong fit"
    } else if score >= 60 {
        "Moderate fit"
    } else {
        "Low fit"
    };

    let mut pros: Vec<String> = tech
        .matched
        .iter()
        .map(|r| format!("Covers requirement: {r}"))
        .collect();
    if geo >= 100.0 {
        pros.push("Lives in the posting's city".to_string());
    }
    let mut cons: Vec<String> = tech
        .missing
        .iter()
        .take(3)
        .map(|r| format!("No evidence of: {r}"))
        .collect();
    if candidate.projects.is_empty() {
        cons.push("No personal projects cited".to_string());
    }

    let tags = [
        candidate.main_skill.clone(),
        candidate.city.clone(),
        job.work_mode.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();

    MatchResult {
        score,
        status: status.to_string(),
        breakdown: Breakdown {
            tech: clamp(tech.score),
            soft: clamp(soft),
            culture: clamp(culture),
            geo: clamp(geo),
        },
        behavioral_traits: Vec::new(),
        ai_insight: build_insight(score, &tech.missing),
        years_exp: candidate.years_exp.unwrap_or(0).max(0) as f64,
        skills,
        tags,
        pros,
        cons,
        project_evaluation: (!candidate.projects.is_empty()).then(|| {
            format!(
                "{} project(s) cited as practical evidence.",
                candidate.projects.len()
            )
        }),
    }
}

fn candidate_skills(candidate: &CandidatePayload) -> Vec<String> {
    let mut skills: Vec<String> = candidate.main_skill.iter().cloned().collect();
    for skill in &candidate.skills {
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.clone());
        }
    }
    skills
}

/// Lowercased free text the substring matcher searches.
fn candidate_text(candidate: &CandidatePayload) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(candidate.bio.as_deref());
    parts.extend(candidate.projects.iter().map(String::as_str));
    parts.extend(candidate.certifications.iter().map(String::as_str));
    for e in &candidate.experiences {
        parts.push(&e.role);
        parts.extend(e.description.as_deref());
    }
    parts.join(" ").to_lowercase()
}

fn tech_fit(requirements: &[String], skills: &[String], text: &str) -> TechFit {
    if requirements.is_empty() {
        return TechFit {
            score: NEUTRAL,
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let mut total = 0.0;
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for requirement in requirements {
        let needle = requirement.to_lowercase();
        let strength = if skills.iter().any(|s| s.to_lowercase() == needle) {
            EXACT_MATCH
        } else if text.contains(&needle) {
            TEXT_MATCH
        } else {
            0.0
        };

        total += strength;
        if strength > 0.0 {
            matched.push(requirement.clone());
        } else {
            missing.push(requirement.clone());
        }
    }

    TechFit {
        score: total / requirements.len() as f64 * 100.0,
        matched,
        missing,
    }
}

fn experience_score(candidate: &CandidatePayload) -> f64 {
    let by_years = candidate.years_exp.unwrap_or(0).max(0) as f64 * 15.0;
    let by_roles = candidate.experiences.len() as f64 * 30.0;
    match by_years.max(by_roles) {
        v if v > 0.0 => v.min(100.0),
        _ => 20.0,
    }
}

fn evidence_score(count: usize, per_item: f64) -> f64 {
    (count as f64 * per_item).min(100.0)
}

fn soft_score(soft_skills: &[String], skills: &[String], text: &str) -> f64 {
    if soft_skills.is_empty() {
        return NEUTRAL;
    }
    let hits = soft_skills
        .iter()
        .filter(|s| {
            let needle = s.to_lowercase();
            skills.iter().any(|k| k.to_lowercase() == needle) || text.contains(&needle)
        })
        .count();
    hits as f64 / soft_skills.len() as f64 * 100.0
}

fn culture_score(culture: Option<&str>, bio: Option<&str>) -> f64 {
    let (Some(culture), Some(bio)) = (culture, bio) else {
        return NEUTRAL;
    };
    let bio = bio.to_lowercase();
    let hits = culture
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 4)
        .filter(|w| bio.contains(&w.to_lowercase()))
        .count();
    (NEUTRAL + hits as f64 * 10.0).min(100.0)
}

fn geo_score(job: &JobPayload, candidate: &CandidatePayload) -> f64 {
    let same_city = match (&job.city, &candidate.city) {
        (Some(a), Some(b)) => a.trim().to_lowercase() == b.trim().to_lowercase(),
        _ => false,
    };
    if same_city {
        100.0
    } else if job.work_mode.as_deref() == Some(WorkMode::RemoteRegional.label()) {
        80.0
    } else {
        30.0
    }
}

fn clamp(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn build_insight(score: u8, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        "Strong fit. The profile directly covers the key requirements of the posting.".to_string()
    } else if top_gaps.is_empty() {
        format!("Fit of {score}/100. Projects and certifications would strengthen the profile.")
    } else {
        format!(
            "Fit of {score}/100. Missing evidence for: {}.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
