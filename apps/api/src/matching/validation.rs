use serde::Serialize;

use crate::llm_client::{strip_json_fences, CompletionError};
use crate::matching::models::{BehavioralTrait, Breakdown, MatchResult, RawMatchResult};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractViolation {
    pub field: String,
    pub reason: String,
}

/// Parses raw completion text into a validated `MatchResult`.
///
/// FAIL conditions (whole result rejected, never partially kept):
/// - text is not JSON
/// - any required field missing or of the wrong type
/// - any score, breakdown value or trait score outside 0..=100 or not finite
/// - `yearsExp` negative or not finite
pub fn parse_match_response(text: &str) -> Result<MatchResult, CompletionError> {
    let raw: RawMatchResult = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| CompletionError::InvalidResponse(format!("match result: {e}")))?;

    validate_match(raw).map_err(|violations| {
        let summary = violations
            .iter()
            .map(|v| format!("{} {}", v.field, v.reason))
            .collect::<Vec<_>>()
            .join("; ");
        CompletionError::InvalidResponse(summary)
    })
}

/// Range-checks a deserialized result. Collects every violation.
pub fn validate_match(raw: RawMatchResult) -> Result<MatchResult, Vec<ContractViolation>> {
    let mut violations = Vec::new();

    let score = check_score("score", raw.score, &mut violations);
    let breakdown = Breakdown {
        tech: check_score("breakdown.tech", raw.breakdown.tech, &mut violations),
        soft: check_score("breakdown.soft", raw.breakdown.soft, &mut violations),
        culture: check_score("breakdown.culture", raw.breakdown.culture, &mut violations),
        geo: check_score("breakdown.geo", raw.breakdown.geo, &mut violations),
    };

    let behavioral_traits = raw
        .behavioral_traits
        .iter()
        .enumerate()
        .map(|(i, t)| BehavioralTrait {
            name: t.name.clone(),
            score: check_score(
                &format!("behavioralTraits[{i}].score"),
                t.score,
                &mut violations,
            ),
        })
        .collect();

    if !raw.years_exp.is_finite() || raw.years_exp < 0.0 {
        violations.push(ContractViolation {
            field: "yearsExp".to_string(),
            reason: format!("must be a non-negative number, got {}", raw.years_exp),
        });
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(MatchResult {
        score,
        status: raw.status,
        breakdown,
        behavioral_traits,
        ai_insight: raw.ai_insight,
        years_exp: raw.years_exp,
        skills: raw.skills,
        tags: raw.tags,
        pros: raw.pros,
        cons: raw.cons,
        project_evaluation: raw.project_evaluation,
    })
}

/// Records a violation for out-of-range values; rounds valid fractional ones.
fn check_score(field: &str, value: f64, violations: &mut Vec<ContractViolation>) -> u8 {
    if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        violations.push(ContractViolation {
            field: field.to_string(),
            reason: format!("must be within 0..=100, got {value}"),
        });
        return 0;
    }
    value.round() as u8
}
