//! Persistence implementations of the old-URL store.
//!
//! - [`PgTrackerRepository`] - production PostgreSQL store
//! - [`InMemoryTrackerRepository`] - in-process store for tests and
//!   single-instance deployments without a database

mod memory_tracker_repository;
mod pg_tracker_repository;

pub use memory_tracker_repository::InMemoryTrackerRepository;
pub use pg_tracker_repository::PgTrackerRepository;
