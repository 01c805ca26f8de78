pub mod applications;
pub mod contact;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postings;
pub mod review;
pub mod store;
