use serde::Serialize;
use std::path::PathBuf;

/// Result of an import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Both files were read and loaded
    Completed(ImportReport),
    /// An input file does not exist; the database was not touched
    MissingInput(PathBuf),
}

/// Counters collected while importing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub users_read: usize,
    pub users_inserted: usize,
    pub lines: usize,
    /// Lines shaped like a review report
    pub reports: usize,
    pub submissions_inserted: usize,
    pub skipped_unmatched: usize,
    pub skipped_unknown_user: usize,
}

impl ImportReport {
    /// `(label, value)` pairs for summary output
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Users read", self.users_read.to_string()),
            ("Users inserted", self.users_inserted.to_string()),
            ("Log lines", self.lines.to_string()),
            ("Report lines", self.reports.to_string()),
            ("Submissions inserted", self.submissions_inserted.to_string()),
            ("Skipped (not a report)", self.skipped_unmatched.to_string()),
            ("Skipped (unknown reviewer)", self.skipped_unknown_user.to_string()),
        ]
    }
}

impl ImportOutcome {
    /// One-line message for the user, naming the file when one is missing
    pub fn message(&self) -> String {
        match self {
            ImportOutcome::Completed(report) => format!(
                "Imported {} users and {} submissions",
                report.users_inserted, report.submissions_inserted
            ),
            ImportOutcome::MissingInput(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                format!("{} is not found", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::{run, ImportPaths};

    #[test]
    fn test_missing_users_message() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(&ImportPaths::in_dir(dir.path())).unwrap();
        assert_eq!(outcome.message(), "users.json is not found");
    }

    #[test]
    fn test_missing_messages_message() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ImportPaths::in_dir(dir.path());
        std::fs::write(&paths.users, "{}").unwrap();

        let outcome = run(&paths).unwrap();
        assert_eq!(outcome.message(), "msgcat.txt is not found");
    }

    #[test]
    fn test_completed_message_and_rows() {
        let report = ImportReport {
            users_inserted: 2,
            submissions_inserted: 5,
            skipped_unknown_user: 1,
            ..Default::default()
        };
        assert_eq!(
            ImportOutcome::Completed(report.clone()).message(),
            "Imported 2 users and 5 submissions"
        );
        assert!(report.rows().contains(&("Skipped (unknown reviewer)", "1".to_string())));
    }
}
