//! Database module for PostgreSQL connectivity
//!
//! Provides connection pool management and read-only candidate/category queries.

pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool};
pub use queries::{CandidateRepository, CandidateSource};
