//! Display model for a stored or freshly computed `MatchResult`.
//!
//! Clients render this directly: breakdown rows, trait bars, capped tags and the
//! two documented fallbacks (placeholder traits, placeholder tag).

use serde::Serialize;

use crate::matching::models::MatchResult;

pub const INSIGHT_FALLBACK: &str = "Analysis unavailable at the moment.";
pub const TAG_PLACEHOLDER: &str = "Analysis required";
pub const PLACEHOLDER_TRAITS: [&str; 4] =
    ["Proactivity", "Communication", "Leadership", "Adaptability"];
pub const MAX_TAGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Strong,
    Moderate,
    Low,
}

impl Band {
    pub fn for_score(score: u8) -> Self {
        if score > 75 {
            Band::Strong
        } else if score > 45 {
            Band::Moderate
        } else {
            Band::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitBar {
    pub name: String,
    pub score: u8,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub score: u8,
    pub status: String,
    /// Rendered verbatim inside quotes.
    pub insight: String,
    pub breakdown: Vec<ScoreRow>,
    pub traits: Vec<TraitBar>,
    pub tags: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_evaluation: Option<String>,
}

impl From<&MatchResult> for MatchView {
    fn from(result: &MatchResult) -> Self {
        let insight = match result.ai_insight.trim() {
            "" => INSIGHT_FALLBACK.to_string(),
            text => format!("\"{text}\""),
        };

        let b = &result.breakdown;
        let breakdown = [
            ("tech", "Technical", b.tech),
            ("soft", "Soft skills", b.soft),
            ("culture", "Culture", b.culture),
            ("geo", "Location", b.geo),
        ]
        .into_iter()
        .map(|(key, label, value)| ScoreRow { key, label, value })
        .collect();

        let traits = if result.behavioral_traits.is_empty() {
            PLACEHOLDER_TRAITS
                .iter()
                .map(|name| TraitBar {
                    name: name.to_string(),
                    score: 0,
                    band: Band::Low,
                })
                .collect()
        } else {
            result
                .behavioral_traits
                .iter()
                .map(|t| TraitBar {
                    name: t.name.clone(),
                    score: t.score,
                    band: Band::for_score(t.score),
                })
                .collect()
        };

        let tags = if result.tags.is_empty() {
            vec![TAG_PLACEHOLDER.to_string()]
        } else {
            result.tags.iter().take(MAX_TAGS).cloned().collect()
        };

        Self {
            score: result.score,
            status: result.status.clone(),
            insight,
            breakdown,
            traits,
            tags,
            pros: result.pros.clone(),
            cons: result.cons.clone(),
            project_evaluation: result.project_evaluation.clone(),
        }
    }
}
