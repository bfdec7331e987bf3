//! SQLite storage implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use rusqlite::{Connection, params, OptionalExtension};
use serde::Serialize;
use crate::{Result, Error};
use crate::submission::Submission;
use crate::user::User;
use super::schema::{self, SchemaObject};

/// SQLite-backed storage for the bot database.
///
/// The connection sits behind a single `Mutex`, so one store can be shared
/// between threads of a process. Every method holds the lock for its whole
/// duration; the connection itself is never handed out.
///
/// Inserts are buffered in a transaction that is opened on the first write
/// after a commit. Nothing is durable until [`BotStore::commit`], and
/// uncommitted writes are rolled back when the store is closed or dropped.
pub struct BotStore {
    conn: Mutex<Connection>,
}

impl BotStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    // The bundled SQLite enables foreign keys by default; reviewers are
    // stored unchecked, so turn enforcement off per connection.
    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Create whichever of the tables and the reviewer index are missing,
    /// then commit. Returns the names of the objects created.
    ///
    /// A failed `CREATE` undoes the objects created by this call and leaves
    /// earlier uncommitted writes as they were.
    pub fn initialize_schema(&self) -> Result<Vec<&'static str>> {
        let conn = self.lock()?;

        let mut missing = Vec::new();
        for object in schema::SCHEMA_OBJECTS {
            if !Self::object_exists(&conn, object)? {
                missing.push(object);
            }
        }
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let started = begin_if_idle(&conn)?;
        conn.execute_batch("SAVEPOINT init_schema")?;
        if let Err(e) = missing.iter().try_for_each(|object| {
            conn.execute(object.create, []).map(|_| ())
        }) {
            conn.execute_batch("ROLLBACK TO init_schema; RELEASE init_schema")?;
            if started {
                conn.execute_batch("ROLLBACK")?;
            }
            return Err(e.into());
        }
        conn.execute_batch("RELEASE init_schema; COMMIT")?;

        let created: Vec<&'static str> = missing.iter().map(|object| object.name).collect();
        tracing::debug!("Created schema objects: {}", created.join(", "));
        Ok(created)
    }

    fn object_exists(conn: &Connection, object: &SchemaObject) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
                params![object.kind.as_str(), object.name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Names of all tables and indexes, sorted
    pub fn schema_objects(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    // ========== User Operations ==========

    /// Insert a user unless the id is already taken (first write wins).
    /// Returns whether a row was inserted. Does not commit.
    pub fn add_user(&self, id: i64, name: &str) -> Result<bool> {
        let conn = self.lock()?;
        begin_if_idle(&conn)?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO users (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
        Ok(changed > 0)
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, name FROM users WHERE id = ?1",
            [id],
            |row| Ok(User { id: row.get(0)?, name: row.get(1)? }),
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn user_exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_user(id)?.is_some())
    }

    /// Count all users
    pub fn count_users(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Submission Operations ==========

    /// Insert a submission unless the id is already taken. The reviewer is
    /// not checked against `users`. Returns whether a row was inserted.
    /// Does not commit.
    pub fn add_submission(&self, id: i64, reviewer: i64) -> Result<bool> {
        let conn = self.lock()?;
        begin_if_idle(&conn)?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO submissions (id, reviewer) VALUES (?1, ?2)",
            params![id, reviewer],
        )?;
        Ok(changed > 0)
    }

    /// Get a submission by id
    pub fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, reviewer FROM submissions WHERE id = ?1",
            [id],
            |row| Ok(Submission { id: row.get(0)?, reviewer: row.get(1)? }),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Ids of all submissions reviewed by `reviewer`, ascending
    pub fn submissions_by_reviewer(&self, reviewer: i64) -> Result<Vec<i64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM submissions WHERE reviewer = ?1 ORDER BY id",
        )?;
        let ids = stmt
            .query_map([reviewer], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Count all submissions
    pub fn count_submissions(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Transactions ==========

    /// Commit everything written since the last commit. No-op when nothing
    /// is pending.
    pub fn commit(&self) -> Result<()> {
        let conn = self.lock()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    /// Release the connection. Pending writes that were not committed are
    /// discarded.
    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().map_err(|_| Error::LockPoisoned)?;
        conn.close().map_err(|(_, e)| Error::from(e))
    }

    // ========== Statistics ==========

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let conn = self.lock()?;
        let (users, submissions, reviewed, reviewers): (i64, i64, i64, i64) = conn.query_row(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM submissions),
                (SELECT COUNT(*) FROM submissions WHERE reviewer IS NOT NULL),
                (SELECT COUNT(DISTINCT reviewer) FROM submissions)
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;
        Ok(DbStats {
            users: users as usize,
            submissions: submissions as usize,
            reviewed: reviewed as usize,
            reviewers: reviewers as usize,
        })
    }

    /// Number of reviewed submissions per reviewer, most active first
    pub fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.reviewer, u.name, COUNT(s.id) AS reviewed
            FROM submissions AS s
            LEFT JOIN users AS u ON u.id = s.reviewer
            WHERE s.reviewer IS NOT NULL
            GROUP BY s.reviewer
            ORDER BY reviewed DESC, s.reviewer
            "#,
        )?;
        let stats = stmt
            .query_map([], |row| {
                let submissions: i64 = row.get(2)?;
                Ok(ReviewerStats {
                    reviewer: row.get(0)?,
                    name: row.get(1)?,
                    submissions: submissions as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }
}

/// Open the write transaction unless one is already running. Returns
/// whether this call opened it.
fn begin_if_idle(conn: &Connection) -> Result<bool> {
    if !conn.is_autocommit() {
        return Ok(false);
    }
    conn.execute_batch("BEGIN")?;
    Ok(true)
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub users: usize,
    pub submissions: usize,
    pub reviewed: usize,
    pub reviewers: usize,
}

impl DbStats {
    /// `(label, value)` pairs for summary output
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Users", self.users.to_string()),
            ("Submissions", self.submissions.to_string()),
            ("Reviewed", self.reviewed.to_string()),
            ("Reviewers", self.reviewers.to_string()),
        ]
    }
}

/// Review count of one reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerStats {
    pub reviewer: i64,
    /// `None` when the reviewer has no row in `users`
    pub name: Option<String>,
    pub submissions: usize,
}
