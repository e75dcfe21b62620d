use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hour every generated occurrence is scheduled at.
pub const OCCURRENCE_HOUR: u32 = 12;

/// Returns `date` at the fixed occurrence time (noon).
pub fn at_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(OCCURRENCE_HOUR, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// How a task repeats.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekdays,
    Monthly,
    Yearly,
}

impl Repeat {
    /// Whether this rule produces occurrences at all.
    pub fn is_recurring(self) -> bool {
        self != Repeat::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Repeat::None => "none",
            Repeat::Daily => "daily",
            Repeat::Weekdays => "weekdays",
            Repeat::Monthly => "monthly",
            Repeat::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekdays" => Ok(Repeat::Weekdays),
            "monthly" => Ok(Repeat::Monthly),
            "yearly" => Ok(Repeat::Yearly),
            other => Err(format!(
                "unknown repeat rule '{}'. Supported: none, daily, weekdays, monthly, yearly",
                other
            )),
        }
    }
}

/// Position of a task inside its series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeriesRole {
    /// The instance whose fields drive regeneration.
    Template,
    /// An instance generated from the template.
    Occurrence,
}

/// Represents a single task instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// The title of the task.
    pub content: String,
    /// Longer free-form notes.
    #[serde(default)]
    pub description: String,
    /// Project the task is filed under, if any.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Label attached to the task, if any.
    #[serde(default)]
    pub label_id: Option<String>,
    /// Owner of the task.
    pub user_id: String,
    /// Date and time the task is scheduled for. Also its due date.
    pub created_at: NaiveDateTime,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Recurrence rule.
    #[serde(default)]
    pub repeat: Repeat,
    /// Last calendar day occurrences may be generated for.
    #[serde(default)]
    pub repeat_until: Option<NaiveDate>,
    /// Series shared by every instance generated from one template.
    #[serde(default)]
    pub series_id: Option<Uuid>,
    /// Role inside the series; set iff `series_id` is.
    #[serde(default)]
    pub series_role: Option<SeriesRole>,
}

impl Task {
    /// Creates a single, non-repeating task.
    pub fn new(content: impl Into<String>, user_id: impl Into<String>, created_at: NaiveDateTime) -> Task {
        Task {
            id: Uuid::new_v4(),
            content: content.into(),
            description: String::new(),
            project_id: None,
            label_id: None,
            user_id: user_id.into(),
            created_at,
            completed: false,
            repeat: Repeat::None,
            repeat_until: None,
            series_id: None,
            series_role: None,
        }
    }

    /// Calendar day the task is scheduled for.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date()
    }

    /// Drops every piece of series metadata, leaving a single task.
    pub fn clear_series(&mut self) {
        self.repeat = Repeat::None;
        self.repeat_until = None;
        self.series_id = None;
        self.series_role = None;
    }

    /// First eight characters of the id, as shown in tables.
    pub fn short_id(&self) -> String {
        short_id(self.id)
    }
}

/// First eight hex digits of `id`; any unique prefix resolves back to it.
pub fn short_id(id: Uuid) -> String {
    let mut s = id.simple().to_string();
    s.truncate(8);
    s
}

/// A partial edit of a task. `None` leaves the field untouched.
///
/// Nullable fields use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub content: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<Option<String>>,
    pub label_id: Option<Option<String>>,
    pub created_at: Option<NaiveDateTime>,
    pub completed: Option<bool>,
    pub repeat: Option<Repeat>,
    pub repeat_until: Option<Option<NaiveDate>>,
}

impl TaskUpdate {
    /// Returns a copy of `task` with this update applied.
    pub fn merged(&self, task: &Task) -> Task {
        let mut t = task.clone();
        if let Some(c) = &self.content { t.content = c.clone(); }
        if let Some(d) = &self.description { t.description = d.clone(); }
        if let Some(p) = &self.project_id { t.project_id = p.clone(); }
        if let Some(l) = &self.label_id { t.label_id = l.clone(); }
        if let Some(at) = self.created_at { t.created_at = at; }
        if let Some(c) = self.completed { t.completed = c; }
        if let Some(r) = self.repeat { t.repeat = r; }
        if let Some(u) = self.repeat_until { t.repeat_until = u; }
        t
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskUpdate::default()
    }
}

/// A project tasks can be filed under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A label; scoped to a project when `project_id` is set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Snapshot of the tasks a user completed on one day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub user_id: String,
    pub user_name: String,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Draft,
    Submitted,
}

/// A user's written report for one calendar month.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    /// `<user>_<YYYY>-<MM>`.
    pub id: String,
    pub user_id: String,
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
    pub content: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_parses_case_insensitively() {
        assert_eq!("Weekdays".parse::<Repeat>(), Ok(Repeat::Weekdays));
        assert_eq!("none".parse::<Repeat>(), Ok(Repeat::None));
        assert!("weekly".parse::<Repeat>().is_err());
    }

    #[test]
    fn short_id_is_a_resolvable_prefix() {
        let task = Task::new("Plan", "alice", at_noon(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(task.short_id().len(), 8);
        assert!(task.id.simple().to_string().starts_with(&task.short_id()));
        assert_eq!(short_id(task.id), task.short_id());
    }

    #[test]
    fn update_only_touches_given_fields() {
        let at = at_noon(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let mut task = Task::new("Write notes", "alice", at);
        task.project_id = Some("proj-1".into());

        let update = TaskUpdate {
            content: Some("Write minutes".into()),
            label_id: Some(Some("lab-1".into())),
            ..TaskUpdate::default()
        };
        let merged = update.merged(&task);
        assert_eq!(merged.content, "Write minutes");
        assert_eq!(merged.label_id.as_deref(), Some("lab-1"));
        assert_eq!(merged.project_id.as_deref(), Some("proj-1"));

        let cleared = TaskUpdate { project_id: Some(None), ..TaskUpdate::default() }.merged(&task);
        assert_eq!(cleared.project_id, None);
    }

    #[test]
    fn task_without_series_fields_deserializes() {
        let json = r#"{
            "id": "6f1c1c2a-9d4e-4b8e-9c57-2f3f0f1a2b3c",
            "content": "Legacy",
            "user_id": "alice",
            "created_at": "2024-01-26T09:30:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.repeat, Repeat::None);
        assert!(task.series_id.is_none());
        assert!(!task.completed);
    }
}
