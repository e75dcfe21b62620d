//! Task collection operations that don't involve series regeneration.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{at_noon, Label, Project, SeriesRole, Task};

/// Day filter for [`fill_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekdays,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekdays" => Ok(Frequency::Weekdays),
            other => Err(format!("unknown frequency '{}'. Supported: daily, weekdays", other)),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Finds the task whose id equals or starts with `prefix`.
pub fn resolve_id(tasks: &[Task], prefix: &str) -> Result<Uuid> {
    let needle = prefix.trim().to_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(Error::TaskNotFound(prefix.to_string()));
    }
    let matches: Vec<Uuid> = tasks
        .iter()
        .filter(|t| t.id.simple().to_string().starts_with(&needle))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::TaskNotFound(prefix.to_string())),
        _ => Err(Error::AmbiguousId { prefix: prefix.to_string(), matches: matches.len() }),
    }
}

/// Adds a new single task at the front of the collection and returns its id.
pub fn add_task(
    tasks: &mut Vec<Task>,
    content: &str,
    project_id: Option<String>,
    label_id: Option<String>,
    user_id: &str,
    created_at: NaiveDateTime,
) -> Uuid {
    let mut task = Task::new(content, user_id, created_at);
    task.project_id = project_id;
    task.label_id = label_id;
    let id = task.id;
    tasks.insert(0, task);
    id
}

/// Copies a task as a fresh, uncompleted single task owned by `user_id`.
pub fn duplicate_task(tasks: &mut Vec<Task>, id: Uuid, user_id: &str, now: NaiveDateTime) -> Result<Uuid> {
    let source = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let mut copy = Task {
        id: Uuid::new_v4(),
        created_at: now,
        completed: false,
        user_id: user_id.to_string(),
        ..source.clone()
    };
    copy.clear_series();
    let new_id = copy.id;
    tasks.insert(0, copy);
    Ok(new_id)
}

/// Flips the completed flag and returns the new value.
pub fn toggle_task(tasks: &mut [Task], id: Uuid) -> Result<bool> {
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    task.completed = !task.completed;
    Ok(task.completed)
}

/// Reschedules one task. Series siblings are not moved.
pub fn move_task(tasks: &mut [Task], id: Uuid, to: NaiveDateTime) -> Result<()> {
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    task.created_at = to;
    Ok(())
}

/// Removes one task and returns it.
///
/// Removing a series template promotes the earliest remaining member of the
/// series to template.
pub fn delete_task(tasks: &mut Vec<Task>, id: Uuid) -> Result<Task> {
    let idx = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let removed = tasks.remove(idx);
    if removed.series_role == Some(SeriesRole::Template) {
        let next = tasks
            .iter_mut()
            .filter(|t| t.series_id == removed.series_id)
            .min_by_key(|t| t.created_at);
        if let Some(next) = next {
            next.series_role = Some(SeriesRole::Template);
        }
    }
    Ok(removed)
}

/// Copies the task `id` onto every day from `start` to `end` inclusive.
///
/// With [`Frequency::Weekdays`] weekend days are skipped, except that the
/// start day always gets a copy unless the source task is already scheduled
/// on it. Copies are plain single tasks. Returns how many were added.
pub fn fill_period(
    tasks: &mut Vec<Task>,
    id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> Result<usize> {
    let source = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?
        .clone();
    if start > end {
        return Err(Error::InvalidPeriod { start, end });
    }

    let copy_on = |date: NaiveDate| {
        let mut t = Task {
            id: Uuid::new_v4(),
            created_at: at_noon(date),
            completed: false,
            ..source.clone()
        };
        t.clear_series();
        t
    };

    let mut added = Vec::new();
    if source.date() != start {
        added.push(copy_on(start));
    }
    added.extend(
        start
            .iter_days()
            .skip(1)
            .take_while(|d| *d <= end)
            .filter(|d| frequency == Frequency::Daily || !is_weekend(*d))
            .map(copy_on),
    );

    let count = added.len();
    tasks.extend(added);
    Ok(count)
}

/// Clears project and label references that no longer exist.
///
/// Returns how many tasks were changed.
pub fn prune_dangling_refs(tasks: &mut [Task], projects: &[Project], labels: &[Label]) -> usize {
    let project_ids: HashSet<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    let label_ids: HashSet<&str> = labels.iter().map(|l| l.id.as_str()).collect();

    let mut changed = 0;
    for t in tasks.iter_mut() {
        let mut touched = false;
        if t.project_id.as_deref().is_some_and(|p| !project_ids.contains(p)) {
            t.project_id = None;
            touched = true;
        }
        if t.label_id.as_deref().is_some_and(|l| !label_ids.contains(l)) {
            t.label_id = None;
            touched = true;
        }
        if touched {
            changed += 1;
        }
    }
    changed
}
