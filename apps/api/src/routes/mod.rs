pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::marketplace::handlers as marketplace;
use crate::matching::handlers as matching;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

/// Resume uploads carry whole documents inline.
const RESUME_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Postings
        .route(
            "/api/v1/jobs",
            post(marketplace::handle_create_job).get(marketplace::handle_list_jobs),
        )
        .route("/api/v1/jobs/mine", get(marketplace::handle_list_my_jobs))
        .route(
            "/api/v1/jobs/:id",
            patch(marketplace::handle_update_job).delete(marketplace::handle_delete_job),
        )
        // Applications and review
        .route("/api/v1/jobs/:id/apply", post(marketplace::handle_apply))
        .route("/api/v1/jobs/:id/match", post(matching::handle_match_job))
        .route("/api/v1/match/preview", post(matching::handle_match_preview))
        .route(
            "/api/v1/jobs/:id/applications",
            get(marketplace::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id/match",
            post(marketplace::handle_compute_match),
        )
        .route(
            "/api/v1/applications/:id/analysis",
            get(marketplace::handle_get_analysis),
        )
        // Candidate dashboard
        .route(
            "/api/v1/me/recommendations",
            get(marketplace::handle_recommendations),
        )
        .route("/api/v1/me/points", get(marketplace::handle_points))
        // Onboarding
        .route(
            "/api/v1/profiles/professional",
            post(profiles::handle_register_professional),
        )
        .route(
            "/api/v1/profiles/company",
            post(profiles::handle_register_company),
        )
        .route(
            "/api/v1/profiles/resume",
            post(profiles::handle_extract_resume).layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        .with_state(state)
}
