//! Response schema sent with every match request (OpenAPI subset used by
//! `responseSchema`). Field names here are the wire contract of `MatchResult`.

use serde_json::{json, Value};

/// Fields the generator must always return. Absence of any one is a failed computation.
pub const REQUIRED_FIELDS: &[&str] = &[
    "score",
    "status",
    "breakdown",
    "behavioralTraits",
    "aiInsight",
    "yearsExp",
    "skills",
    "tags",
    "pros",
    "cons",
];

pub const BREAKDOWN_FIELDS: &[&str] = &["tech", "soft", "culture", "geo"];

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn match_response_schema() -> Value {
    let breakdown_properties: serde_json::Map<String, Value> = BREAKDOWN_FIELDS
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "NUMBER" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "status": { "type": "STRING" },
            "breakdown": {
                "type": "OBJECT",
                "properties": breakdown_properties,
                "required": BREAKDOWN_FIELDS
            },
            "behavioralTraits": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "score": { "type": "NUMBER" }
                    },
                    "required": ["name", "score"]
                }
            },
            "aiInsight": { "type": "STRING" },
            "yearsExp": { "type": "NUMBER" },
            "skills": string_array(),
            "tags": string_array(),
            "pros": string_array(),
            "cons": string_array(),
            "projectEvaluation": { "type": "STRING" }
        },
        "required": REQUIRED_FIELDS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_all_contract_fields() {
        let schema = match_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        assert!(!required.contains(&"projectEvaluation"));
    }

    #[test]
    fn test_every_required_field_has_a_property() {
        let schema = match_response_schema();
        for field in REQUIRED_FIELDS {
            assert!(
                schema["properties"].get(*field).is_some(),
                "missing property {field}"
            );
        }
    }

    #[test]
    fn test_breakdown_has_four_required_numbers() {
        let schema = match_response_schema();
        let breakdown = &schema["properties"]["breakdown"];
        assert_eq!(breakdown["required"].as_array().unwrap().len(), 4);
        for field in BREAKDOWN_FIELDS {
            assert_eq!(breakdown["properties"][*field]["type"], "NUMBER");
        }
    }

    #[test]
    fn test_traits_are_name_score_objects() {
        let schema = match_response_schema();
        let items = &schema["properties"]["behavioralTraits"]["items"];
        assert_eq!(items["properties"]["name"]["type"], "STRING");
        assert_eq!(items["properties"]["score"]["type"], "NUMBER");
    }
}
