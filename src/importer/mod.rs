//! One-shot import of the user map and the message log into the store.
//!
//! Both inputs are checked before the database is opened, so a run with a
//! missing file leaves no database behind. Users are committed as one batch,
//! then submissions as another. Re-running over the same (or overlapping)
//! files is harmless since every insert is insert-or-ignore.

mod report;

pub use report::{ImportOutcome, ImportReport};

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::BotStore;
use crate::submission::SubmissionReport;
pub use crate::user::UserMap;
use crate::{Error, Result};

/// Default database file name
pub const DEFAULT_DATABASE: &str = "caos.db";
/// Default user map file name
pub const DEFAULT_USERS: &str = "users.json";
/// Default message log file name
pub const DEFAULT_MESSAGES: &str = "msgcat.txt";

/// Locations of the database and both input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPaths {
    pub database: PathBuf,
    pub users: PathBuf,
    pub messages: PathBuf,
}

impl ImportPaths {
    /// The default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            database: dir.join(DEFAULT_DATABASE),
            users: dir.join(DEFAULT_USERS),
            messages: dir.join(DEFAULT_MESSAGES),
        }
    }

    /// First input file that does not exist, users before messages
    pub fn missing_input(&self) -> Option<&Path> {
        [&self.users, &self.messages]
            .into_iter()
            .find(|path| !path.exists())
            .map(PathBuf::as_path)
    }
}

/// Decode the user map file
pub fn load_user_map(path: &Path) -> Result<UserMap> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| Error::UserMap {
        path: path.to_path_buf(),
        source,
    })
}

/// Run a full import.
pub fn run(paths: &ImportPaths) -> Result<ImportOutcome> {
    if let Some(missing) = paths.missing_input() {
        tracing::debug!("Input file {} not found, nothing imported", missing.display());
        return Ok(ImportOutcome::MissingInput(missing.to_path_buf()));
    }

    let store = BotStore::open(&paths.database)?;
    store.initialize_schema()?;

    let users = load_user_map(&paths.users)?;
    let contents = fs::read(&paths.messages)?;
    let log = String::from_utf8_lossy(&contents);

    let importer = Importer::new(&store);
    let mut report = ImportReport::default();
    importer.import_users(&users, &mut report)?;
    importer.import_messages(&log, &users, &mut report)?;

    store.close()?;
    tracing::info!(
        "Imported {} users and {} submissions into {}",
        report.users_inserted,
        report.submissions_inserted,
        paths.database.display()
    );
    Ok(ImportOutcome::Completed(report))
}

/// Drives the store's inserts for one import run
pub struct Importer<'a> {
    store: &'a BotStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a BotStore) -> Self {
        Self { store }
    }

    /// Insert every user of the map in file order, then commit once.
    pub fn import_users(&self, users: &UserMap, report: &mut ImportReport) -> Result<()> {
        for entry in users.values() {
            let user = entry.to_user();
            if self.store.add_user(user.id, &user.name)? {
                report.users_inserted += 1;
            }
            report.users_read += 1;
        }
        self.store.commit()
    }

    /// Insert a submission for every report line whose reviewer is in the
    /// map, then commit once. Other lines are skipped.
    pub fn import_messages(
        &self,
        log: &str,
        users: &UserMap,
        report: &mut ImportReport,
    ) -> Result<()> {
        for (index, line) in log.split('\n').enumerate() {
            report.lines += 1;

            let Some(parsed) = SubmissionReport::parse(line) else {
                report.skipped_unmatched += 1;
                continue;
            };
            report.reports += 1;

            let Some(reviewer) = users.get(parsed.reviewer) else {
                tracing::debug!(
                    "Line {}: unknown reviewer [{}] for submission {}",
                    index + 1,
                    parsed.reviewer,
                    parsed.submission_id
                );
                report.skipped_unknown_user += 1;
                continue;
            };

            if self.store.add_submission(parsed.submission_id, reviewer.id())? {
                report.submissions_inserted += 1;
            }
        }
        self.store.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_inputs(dir: &Path, users: &str, messages: &str) -> ImportPaths {
        let paths = ImportPaths::in_dir(dir);
        fs::write(&paths.users, users).unwrap();
        fs::write(&paths.messages, messages).unwrap();
        paths
    }

    fn completed(outcome: ImportOutcome) -> ImportReport {
        match outcome {
            ImportOutcome::Completed(report) => report,
            other => panic!("expected a completed import, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(
            dir.path(),
            r#"{"ab": [1, "Alice B"]}"#,
            "[2024-01-01] 42 - reviewed [ab]",
        );

        let report = completed(run(&paths).unwrap());
        assert_eq!(report.users_inserted, 1);
        assert_eq!(report.submissions_inserted, 1);

        let store = BotStore::open(&paths.database).unwrap();
        assert_eq!(store.get_user(1).unwrap().unwrap().name, "Alice B");
        let submission = store.get_submission(42).unwrap().unwrap();
        assert_eq!(submission.reviewer, Some(1));
    }

    #[test]
    fn test_skips_unmatched_and_unknown_lines() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(
            dir.path(),
            r#"{"ab": [1, "Alice B"]}"#,
            "not a submission line\n[2024-01-01] 42 - reviewed [zz]\n\n[p1] 7 - ok [ab]\n",
        );

        let report = completed(run(&paths).unwrap());
        assert_eq!(report.lines, 5);
        assert_eq!(report.reports, 2);
        assert_eq!(report.skipped_unmatched, 3);
        assert_eq!(report.skipped_unknown_user, 1);
        assert_eq!(report.submissions_inserted, 1);

        let store = BotStore::open(&paths.database).unwrap();
        assert!(store.get_submission(42).unwrap().is_none());
        assert_eq!(store.count_submissions().unwrap(), 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(
            dir.path(),
            r#"{"ab": [1, "Alice B"], "cd": [2, "Carl D"]}"#,
            "[a] 1 - ok [ab]\n[b] 2 - ok [cd]\n[c] 1 - again [cd]",
        );

        let first = completed(run(&paths).unwrap());
        assert_eq!(first.submissions_inserted, 2);

        let second = completed(run(&paths).unwrap());
        assert_eq!(second.users_inserted, 0);
        assert_eq!(second.submissions_inserted, 0);

        let store = BotStore::open(&paths.database).unwrap();
        assert_eq!(store.count_users().unwrap(), 2);
        assert_eq!(store.get_submission(1).unwrap().unwrap().reviewer, Some(1));
    }

    #[test]
    fn test_missing_messages_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ImportPaths::in_dir(dir.path());
        fs::write(&paths.users, r#"{"ab": [1, "Alice B"]}"#).unwrap();

        let outcome = run(&paths).unwrap();
        assert_eq!(outcome, ImportOutcome::MissingInput(paths.messages.clone()));
        assert!(!paths.database.exists());
    }

    #[test]
    fn test_missing_users_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ImportPaths::in_dir(dir.path());

        let outcome = run(&paths).unwrap();
        assert_eq!(outcome, ImportOutcome::MissingInput(paths.users.clone()));
    }

    #[test]
    fn test_existing_rows_survive_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(dir.path(), r#"{"ab": [1, "Alice B"]}"#, "");
        completed(run(&paths).unwrap());

        fs::remove_file(&paths.messages).unwrap();
        let outcome = run(&paths).unwrap();
        assert!(matches!(outcome, ImportOutcome::MissingInput(_)));

        let store = BotStore::open(&paths.database).unwrap();
        assert_eq!(store.count_users().unwrap(), 1);
        assert_eq!(store.schema_objects().unwrap().len(), 3);
    }

    #[test]
    fn test_legacy_user_map_format() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(
            dir.path(),
            r#"{"AB": [10, "Anna", "Belova"]}"#,
            "[x] 5 - ok [AB]",
        );

        completed(run(&paths).unwrap());

        let store = BotStore::open(&paths.database).unwrap();
        assert_eq!(store.get_user(10).unwrap().unwrap().name, "Anna Belova");
        assert_eq!(store.submissions_by_reviewer(10).unwrap(), vec![5]);
    }

    #[test]
    fn test_shared_id_takes_name_first_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(
            dir.path(),
            r#"{"zz": [1, "First In File"], "aa": [1, "Second In File"]}"#,
            "[q] 12 - ok [aa]",
        );

        let report = completed(run(&paths).unwrap());
        assert_eq!(report.users_read, 2);
        assert_eq!(report.users_inserted, 1);

        let store = BotStore::open(&paths.database).unwrap();
        assert_eq!(store.get_user(1).unwrap().unwrap().name, "First In File");
        assert_eq!(store.submissions_by_reviewer(1).unwrap(), vec![12]);
    }

    #[test]
    fn test_malformed_user_map_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(dir.path(), "{not json", "");

        let err = run(&paths).unwrap_err();
        assert!(matches!(err, Error::UserMap { .. }));
    }

    #[test]
    fn test_importer_against_memory_store() {
        let store = BotStore::open_in_memory().unwrap();
        store.initialize_schema().unwrap();
        let users: UserMap = serde_json::from_str(r#"{"ab": [1, "Alice B"]}"#).unwrap();

        let importer = Importer::new(&store);
        let mut report = ImportReport::default();
        importer.import_users(&users, &mut report).unwrap();
        importer
            .import_messages("[d] 3 - ok [ab]\r\n[d] 4 - ok [ab]", &users, &mut report)
            .unwrap();

        assert_eq!(report.users_read, 1);
        assert_eq!(store.submissions_by_reviewer(1).unwrap(), vec![3, 4]);
    }
}
