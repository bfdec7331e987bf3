//! # caosdb - review bot database bootstrap
//!
//! Populates the SQLite database used by the submission review bot from two
//! externally produced files:
//! - `users.json`: abbreviated reviewer name -> `[id, full name]`
//! - `msgcat.txt`: the bot's old channel messages joined with newlines
//!
//! caosdb provides:
//! - A lock-guarded store with idempotent (`INSERT OR IGNORE`) inserts
//! - A one-shot importer that extracts submission reports from the log
//! - Read helpers for per-reviewer statistics

pub mod user;
pub mod submission;
pub mod storage;
pub mod importer;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use user::User;
pub use submission::{Submission, SubmissionReport};
pub use storage::BotStore;
pub use importer::{ImportOutcome, ImportPaths, ImportReport};

use std::path::PathBuf;

/// Result type alias for caosdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for caosdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid user map {}: {source}", path.display())]
    UserMap {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store lock poisoned by a panicking thread")]
    LockPoisoned,
}
