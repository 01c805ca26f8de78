// Match Engine prompt templates.
// The rubric weights are instructions to the generator; no local code enforces them.

/// Persona for match scoring. `llm_client::prompts::with_json_rule` is appended.
pub const MATCH_SYSTEM: &str = "\
You are a Senior Technical Recruiter specialised in the Santa Catarina (SC) job market. \
You produce critical, evidence-based compatibility reports between one job posting and one candidate.";

/// Match prompt. Replace `{job_json}` and `{candidate_json}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Perform a precise match between the job posting and the candidate below, weighting:

1. EXPERIENCE AND EDUCATION (weight 40%): relevance of prior roles and time in the market.
2. PERSONAL PROJECTS AND PORTFOLIO (weight 25%): practical projects, GitHub links, apps or real solutions the candidate cites. Reward technical initiative.
3. CERTIFICATIONS (weight 15%): market certifications (Cloud, Management, Languages) add to the score.
4. SOFT SKILLS AND CULTURE (weight 10%): alignment with the values described.
5. GEOLOCATION (weight 10%): proximity to the SC city named in the posting.

JOB: {job_json}
CANDIDATE: {candidate_json}

Write a critical assessment explaining how the candidate's projects and certifications affected the final score.

OUTPUT RULES:
- "score": overall fit 0-100.
- "breakdown": "tech", "soft", "culture", "geo", each 0-100, scored independently.
- "behavioralTraits": list of {"name", "score"} with score 0-100.
- "aiInsight": one paragraph.
- "pros" / "cons": short phrases; either may be empty.
- "tags": short labels.
- "projectEvaluation": optional one-sentence evaluation of the candidate's projects."#;

pub fn build_match_prompt(job_json: &str, candidate_json: &str) -> String {
    MATCH_PROMPT_TEMPLATE
        .replace("{job_json}", job_json)
        .replace("{candidate_json}", candidate_json)
}
