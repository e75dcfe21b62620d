//! Error types for `dayplan`.

use chrono::NaiveDate;

/// Errors raised by task, catalog, report and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON encoding error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No task matches the given id or prefix.
    #[error("Task {0} not found")]
    TaskNotFound(String),

    /// The id prefix matches more than one task.
    #[error("Task id '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousId {
        /// The prefix that was given.
        prefix: String,
        /// How many tasks it matched.
        matches: usize,
    },

    /// No project with the given id or name.
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    /// No label with the given id or name.
    #[error("Label '{0}' not found")]
    LabelNotFound(String),

    /// The label is scoped to a project other than the task's.
    #[error("Label '{0}' belongs to another project")]
    LabelOutOfScope(String),

    /// A date argument could not be parsed.
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
        /// Why it failed.
        reason: String,
    },

    /// The period start is after its end.
    #[error("Period start {start} is after its end {end}")]
    InvalidPeriod {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },

    /// A daily report for this user and day already exists.
    #[error("Already reported for {0}")]
    AlreadyReported(NaiveDate),

    /// There are no completed tasks to report for the day.
    #[error("No completed tasks to report for {0}")]
    NothingToReport(NaiveDate),

    /// No report with the given id or day.
    #[error("Report {0} not found")]
    ReportNotFound(String),

    /// The monthly report was already submitted and is read-only.
    #[error("Report {0} is already submitted")]
    ReportSubmitted(String),
}

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        let err = Error::AmbiguousId { prefix: "ab".into(), matches: 3 };
        assert_eq!(err.to_string(), "Task id 'ab' is ambiguous (3 matches)");

        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(Error::AlreadyReported(day).to_string(), "Already reported for 2024-05-02");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
