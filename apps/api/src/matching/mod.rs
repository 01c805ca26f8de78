pub mod engine;
pub mod handlers;
pub mod heuristic;
pub mod models;
pub mod payload;
pub mod preview;
pub mod prompts;
pub mod schema;
pub mod validation;
pub mod view;
