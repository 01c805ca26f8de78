use anyhow::{Context, Result};

use crate::llm_client::GEMINI_API_BASE;

/// Which backend produces match results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Llm,
    Heuristic,
}

impl ScorerBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "llm" | "gemini" => Ok(ScorerBackend::Llm),
            "heuristic" | "local" => Ok(ScorerBackend::Heuristic),
            other => anyhow::bail!("MATCH_SCORER must be 'llm' or 'heuristic', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// Only `DATABASE_URL` is required at startup. A missing `GEMINI_API_KEY` does not
/// stop the server: every AI call then fails with a distinct configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    /// Models endpoint root, without a trailing slash.
    pub gemini_base_url: String,
    pub match_model: String,
    pub resume_model: String,
    /// Attempts per completion call. 1 means no automatic retry.
    pub gemini_max_attempts: u32,
    pub match_scorer: ScorerBackend,
    pub apply_reward_points: i32,
    pub contact_phone: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_base_url: optional_env("GEMINI_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            match_model: optional_env("GEMINI_MATCH_MODEL")
                .unwrap_or_else(|| "gemini-3-flash-preview".to_string()),
            resume_model: optional_env("GEMINI_RESUME_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            gemini_max_attempts: parse_env("GEMINI_MAX_ATTEMPTS", 1u32)?.max(1),
            match_scorer: match optional_env("MATCH_SCORER") {
                Some(raw) => ScorerBackend::parse(&raw)?,
                None => ScorerBackend::Llm,
            },
            apply_reward_points: parse_env("APPLY_REWARD_POINTS", 50i32)?,
            contact_phone: optional_env("CONTACT_PHONE")
                .unwrap_or_else(|| "5548999999999".to_string()),
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobway_test".to_string(),
            gemini_api_key: None,
            gemini_base_url: GEMINI_API_BASE.to_string(),
            match_model: "gemini-test".to_string(),
            resume_model: "gemini-test".to_string(),
            gemini_max_attempts: 1,
            match_scorer: ScorerBackend::Llm,
            apply_reward_points: 50,
            contact_phone: "5548999999999".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorer_backend_accepts_aliases() {
        assert_eq!(ScorerBackend::parse("LLM").unwrap(), ScorerBackend::Llm);
        assert_eq!(ScorerBackend::parse("gemini").unwrap(), ScorerBackend::Llm);
        assert_eq!(
            ScorerBackend::parse(" heuristic ").unwrap(),
            ScorerBackend::Heuristic
        );
    }

    #[test]
    fn test_scorer_backend_rejects_unknown() {
        let err = ScorerBackend::parse("random").unwrap_err();
        assert!(err.to_string().contains("random"));
    }

    #[test]
    fn test_test_config_has_no_api_key() {
        let config = Config::for_tests();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_max_attempts, 1);
        assert_eq!(config.apply_reward_points, 50);
    }
}
