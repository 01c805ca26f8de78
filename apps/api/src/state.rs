use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::StructuredCompletion;
use crate::marketplace::applications::ApplySettings;
use crate::marketplace::store::MarketplaceStore;
use crate::matching::engine::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketplaceStore>,
    /// Pluggable match scorer. Default: LlmMatchScorer. Swap via MATCH_SCORER.
    pub scorer: Arc<dyn MatchScorer>,
    /// Structured completion used by resume extraction.
    pub completion: Arc<dyn StructuredCompletion>,
    pub config: Config,
}

impl AppState {
    pub fn apply_settings(&self) -> ApplySettings {
        ApplySettings {
            reward_points: self.config.apply_reward_points,
            contact_phone: self.config.contact_phone.clone(),
        }
    }
}
