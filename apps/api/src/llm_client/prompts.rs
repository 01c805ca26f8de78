// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every system instruction: the response schema is the contract.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single JSON object that matches the provided response schema. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Every numeric score is an integer between 0 and 100.";

/// Appends the JSON-only rule to a system persona.
pub fn with_json_rule(system: &str) -> String {
    format!("{system}\n\n{JSON_ONLY_INSTRUCTION}")
}
