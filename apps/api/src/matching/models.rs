use serde::{Deserialize, Serialize};

/// Rubric decomposition reported by the generator. The four values are independent
/// of `MatchResult::score`; nothing requires them to sum or average to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub tech: u8,
    pub soft: u8,
    pub culture: u8,
    pub geo: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralTrait {
    pub name: String,
    pub score: u8,
}

/// Validated compatibility report for one (posting, candidate) pair.
///
/// Only `validation::validate_match` and the heuristic scorer construct it, so
/// every numeric field is already within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub score: u8,
    pub status: String,
    pub breakdown: Breakdown,
    pub behavioral_traits: Vec<BehavioralTrait>,
    pub ai_insight: String,
    pub years_exp: f64,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_evaluation: Option<String>,
}

// Wire shapes as returned by the completion service, before range checks.
// Every field without `default` is required: a missing one fails deserialization.

#[derive(Debug, Clone, Deserialize)]
pub struct RawBreakdown {
    pub tech: f64,
    pub soft: f64,
    pub culture: f64,
    pub geo: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrait {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchResult {
    pub score: f64,
    pub status: String,
    pub breakdown: RawBreakdown,
    pub behavioral_traits: Vec<RawTrait>,
    pub ai_insight: String,
    pub years_exp: f64,
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    #[serde(default)]
    pub project_evaluation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_result_uses_camel_case_wire_names() {
        let result = MatchResult {
            score: 80,
            status: "Strong fit".to_string(),
            breakdown: Breakdown {
                tech: 90,
                soft: 70,
                culture: 60,
                geo: 100,
            },
            behavioral_traits: vec![BehavioralTrait {
                name: "Proactivity".to_string(),
                score: 75,
            }],
            ai_insight: "Solid React portfolio.".to_string(),
            years_exp: 4.0,
            skills: vec!["React".to_string()],
            tags: vec![],
            pros: vec![],
            cons: vec![],
            project_evaluation: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["behavioralTraits"][0]["name"], "Proactivity");
        assert_eq!(value["aiInsight"], "Solid React portfolio.");
        assert_eq!(value["yearsExp"], 4.0);
        assert!(value.get("projectEvaluation").is_none());
    }

    #[test]
    fn test_raw_result_requires_every_contract_field() {
        let missing_cons = json!({
            "score": 70, "status": "ok",
            "breakdown": {"tech": 1, "soft": 1, "culture": 1, "geo": 1},
            "behavioralTraits": [], "aiInsight": "", "yearsExp": 1,
            "skills": [], "tags": [], "pros": []
        });
        let err = serde_json::from_value::<RawMatchResult>(missing_cons).unwrap_err();
        assert!(err.to_string().contains("cons"));
    }
}
