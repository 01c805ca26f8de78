pub mod extraction;
pub mod handlers;
pub mod registration;
