//! Storage Layer - SQLite-backed persistence
//!
//! The bot database holds two tables:
//! - users(id, name)
//! - submissions(id, reviewer) with an index on reviewer

pub mod schema;
pub mod sqlite;

pub use sqlite::{BotStore, DbStats, ReviewerStats};
