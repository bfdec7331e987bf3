//! Submission records and review report lines
//!
//! The first bot version announced every finished review in the channel as
//!
//! ```text
//! [<problem>] <submission id> - <verdict> [<reviewer initials>]
//! ```
//!
//! and the message log is a plain concatenation of those announcements with
//! everything else that was posted. Only lines of that shape carry data.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Pattern of a review report line.
///
/// Searched, not anchored. The middle `.*` is greedy so the last bracketed
/// token on the line is taken as the reviewer. Ids are ASCII digits only,
/// the same set `i64::from_str` accepts.
pub const REPORT_LINE_PATTERN: &str = r"\[.+?\] ([0-9]+) - .* \[(.+?)\]";

static REPORT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(REPORT_LINE_PATTERN).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}': {}. This is a programming error.",
            REPORT_LINE_PATTERN, e
        )
    })
});

/// A row in the `submissions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Judge run id, primary key
    pub id: i64,
    /// `users.id` of the reviewer, if known
    pub reviewer: Option<i64>,
}

/// A review report extracted from one message log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReport<'a> {
    pub submission_id: i64,
    /// Abbreviated reviewer name, a key of the user map
    pub reviewer: &'a str,
}

impl<'a> SubmissionReport<'a> {
    /// Parse a single log line. Returns `None` for anything that is not a
    /// report, including ids that do not fit in an `i64`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = REPORT_LINE_RE.captures(line)?;
        let submission_id = caps.get(1)?.as_str().parse::<i64>().ok()?;
        let reviewer = caps.get(2)?.as_str();
        Some(Self {
            submission_id,
            reviewer,
        })
    }
}
