use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{default_labels, default_projects};
use crate::error::Result;
use crate::models::{DailyReport, Label, MonthlyReport, Project, Task};

const TASKS_FILE: &str = "tasks.json";
const PROJECTS_FILE: &str = "projects.json";
const LABELS_FILE: &str = "labels.json";
const DAILY_REPORTS_FILE: &str = "daily_reports.json";
const MONTHLY_REPORTS_FILE: &str = "monthly_reports.json";

/// JSON files holding every collection, one file per collection.
///
/// Each collection is read whole and written back whole.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Store> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Loads all tasks. Missing or unreadable files yield an empty list.
    pub fn load_tasks(&self) -> Vec<Task> {
        load_json(&self.path(TASKS_FILE)).unwrap_or_default()
    }

    /// Saves the given list of tasks, overwriting the existing file.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        save_json(&self.path(TASKS_FILE), tasks)
    }

    /// Loads projects, falling back to the default set.
    pub fn load_projects(&self) -> Vec<Project> {
        load_json(&self.path(PROJECTS_FILE)).unwrap_or_else(default_projects)
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<()> {
        save_json(&self.path(PROJECTS_FILE), projects)
    }

    /// Loads labels, falling back to the default set.
    pub fn load_labels(&self) -> Vec<Label> {
        load_json(&self.path(LABELS_FILE)).unwrap_or_else(default_labels)
    }

    pub fn save_labels(&self, labels: &[Label]) -> Result<()> {
        save_json(&self.path(LABELS_FILE), labels)
    }

    pub fn load_daily_reports(&self) -> Vec<DailyReport> {
        load_json(&self.path(DAILY_REPORTS_FILE)).unwrap_or_default()
    }

    pub fn save_daily_reports(&self, reports: &[DailyReport]) -> Result<()> {
        save_json(&self.path(DAILY_REPORTS_FILE), reports)
    }

    pub fn load_monthly_reports(&self) -> Vec<MonthlyReport> {
        load_json(&self.path(MONTHLY_REPORTS_FILE)).unwrap_or_default()
    }

    pub fn save_monthly_reports(&self, reports: &[MonthlyReport]) -> Result<()> {
        save_json(&self.path(MONTHLY_REPORTS_FILE), reports)
    }

    /// Deletes every collection file.
    pub fn delete_all(&self) -> Result<()> {
        for file in [TASKS_FILE, PROJECTS_FILE, LABELS_FILE, DAILY_REPORTS_FILE, MONTHLY_REPORTS_FILE] {
            let path = self.path(file);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Reads `path` as JSON. Returns `None` when the file is missing or can't be
/// parsed, so callers fall back to their default.
fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let mut f = match OpenOptions::new().read(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not open data file");
            return None;
        }
    };
    let mut s = String::new();
    if let Err(e) = f.read_to_string(&mut s) {
        warn!(path = %path.display(), error = %e, "could not read data file");
        return None;
    }
    match serde_json::from_str(&s) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unparseable data file");
            None
        }
    }
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    debug!(path = %path.display(), bytes = s.len(), "saved data file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::at_noon;
    use chrono::NaiveDate;

    #[test]
    fn round_trips_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.load_tasks().is_empty());

        let task = Task::new("Persist me", "alice", at_noon(NaiveDate::from_ymd_opt(2024, 1, 26).unwrap()));
        store.save_tasks(&[task.clone()]).unwrap();
        assert_eq!(store.load_tasks(), vec![task]);
    }

    #[test]
    fn missing_catalog_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.load_projects(), default_projects());
        assert_eq!(store.load_labels(), default_labels());

        store.save_projects(&[]).unwrap();
        assert!(store.load_projects().is_empty());
    }

    #[test]
    fn corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        fs::write(dir.path().join(TASKS_FILE), "{ not json").unwrap();
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn creates_nested_dir_and_deletes_all() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = Store::open(&nested).unwrap();
        assert!(nested.exists());

        store.save_tasks(&[]).unwrap();
        store.save_labels(&[]).unwrap();
        store.delete_all().unwrap();
        assert!(!nested.join(TASKS_FILE).exists());
        assert!(!nested.join(LABELS_FILE).exists());
    }
}
