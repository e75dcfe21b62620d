//! Recurring task series.
//!
//! A series is every task sharing one `series_id`. Exactly one member is the
//! template; editing its repeat rule purges the other members and rebuilds
//! them from the template's fields. All functions here are pure: they take
//! the task collection by value and hand back the replacement for the caller
//! to persist.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{at_noon, Repeat, SeriesRole, Task, TaskUpdate};

/// Returns the day after `date` in a series following `rule`.
///
/// Month and year steps keep the day of month, clamped to the last day of
/// shorter months (Jan 31 -> Feb 29/28, Feb 29 -> Feb 28 next year).
/// Returns `None` for [`Repeat::None`] and past the end of the calendar.
pub fn next_occurrence(date: NaiveDate, rule: Repeat) -> Option<NaiveDate> {
    match rule {
        Repeat::None => None,
        Repeat::Daily => date.succ_opt(),
        Repeat::Weekdays => {
            let next = date.succ_opt()?;
            match next.weekday() {
                Weekday::Sat => next.checked_add_days(Days::new(2)),
                Weekday::Sun => next.succ_opt(),
                _ => Some(next),
            }
        }
        Repeat::Monthly => date.checked_add_months(Months::new(1)),
        Repeat::Yearly => date.checked_add_months(Months::new(12)),
    }
}

/// Dates following `start` under `rule`, up to and including `until`.
///
/// `start` itself is not yielded. Each step is taken from the previous
/// occurrence, so a clamped month end stays clamped (Jan 31, Feb 29, Mar 29).
pub fn occurrence_dates(start: NaiveDate, rule: Repeat, until: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(next_occurrence(start, rule), move |d| next_occurrence(*d, rule))
        .take_while(move |d| *d <= until)
}

/// Rebuilds the series `template` belongs to.
///
/// Every other member of the template's series is dropped. A template with no
/// rule or no end date is reduced to a single task. Otherwise one fresh,
/// uncompleted copy of the template is added per occurrence date up to
/// `repeat_until`. Tasks outside the series are left alone.
pub fn regenerate_series(tasks: Vec<Task>, mut template: Task) -> Vec<Task> {
    let old_series = template.series_id;
    let before = tasks.len();
    let mut tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|t| t.id == template.id || old_series.is_none() || t.series_id != old_series)
        .collect();
    let purged = before - tasks.len();

    let until = match template.repeat_until {
        Some(until) if template.repeat.is_recurring() => until,
        _ => {
            debug!(task = %template.id, purged, "series collapsed to a single task");
            template.clear_series();
            put(&mut tasks, template);
            return tasks;
        }
    };

    let series_id = *template.series_id.get_or_insert_with(Uuid::new_v4);
    template.series_role = Some(SeriesRole::Template);

    let occurrences: Vec<Task> = occurrence_dates(template.date(), template.repeat, until)
        .map(|date| Task {
            id: Uuid::new_v4(),
            created_at: at_noon(date),
            completed: false,
            series_role: Some(SeriesRole::Occurrence),
            ..template.clone()
        })
        .collect();

    debug!(
        series = %series_id,
        rule = %template.repeat,
        %until,
        purged,
        generated = occurrences.len(),
        "series regenerated"
    );

    put(&mut tasks, template);
    tasks.extend(occurrences);
    tasks
}

/// Replaces the task with the same id, or appends it.
fn put(tasks: &mut Vec<Task>, task: Task) {
    match tasks.iter_mut().find(|t| t.id == task.id) {
        Some(slot) => *slot = task,
        None => tasks.push(task),
    }
}

/// What an edit does to the series of the edited task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A single task gains a repeat rule together with an end date.
    StartSeries,
    /// A recurring task's rule or end date changes.
    ChangeSeries,
    /// A recurring task loses its repeat rule.
    StopSeries,
    /// Nothing about the series changes.
    Plain,
}

impl Transition {
    /// Classifies the edit turning `before` into `after`.
    ///
    /// A task only counts as recurring once it belongs to a series. A rule
    /// without an end date is kept on the task as a pending rule and starts
    /// the series as soon as an end date is set. Starting or changing a
    /// series takes priority over stopping one, which takes priority over a
    /// plain update.
    pub fn classify(before: &Task, after: &Task) -> Transition {
        let was_recurring = before.repeat.is_recurring() && before.series_id.is_some();
        let recurs = after.repeat.is_recurring();
        let starts = recurs && after.repeat_until.is_some();
        let rule_changed = before.repeat != after.repeat || before.repeat_until != after.repeat_until;

        if starts && !was_recurring {
            Transition::StartSeries
        } else if was_recurring && recurs && rule_changed {
            Transition::ChangeSeries
        } else if was_recurring && !recurs {
            Transition::StopSeries
        } else {
            Transition::Plain
        }
    }
}

/// Applies `update` to the task `id`, keeping its series consistent.
///
/// This is the single entry point for task edits:
/// - starting or changing a rule reuses (or mints) the series id, makes the
///   edited task the template and regenerates the series;
/// - removing the rule deletes every sibling and strips the series fields;
/// - anything else is a plain field update. A task left without a rule
///   never keeps an end date or series metadata.
pub fn apply_update(mut tasks: Vec<Task>, id: Uuid, update: &TaskUpdate) -> Result<Vec<Task>> {
    let idx = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let original = &tasks[idx];
    let updated = update.merged(original);
    let transition = Transition::classify(original, &updated);
    let series_id = original.series_id;
    debug!(task = %id, ?transition, "applying task update");

    match transition {
        Transition::StartSeries | Transition::ChangeSeries => {
            let mut template = updated;
            template.series_id = Some(series_id.unwrap_or_else(Uuid::new_v4));
            Ok(regenerate_series(tasks, template))
        }
        Transition::StopSeries => {
            if series_id.is_some() {
                tasks.retain(|t| t.id == id || t.series_id != series_id);
            }
            let mut single = updated;
            single.clear_series();
            put(&mut tasks, single);
            Ok(tasks)
        }
        Transition::Plain => {
            let mut updated = updated;
            if !updated.repeat.is_recurring() {
                updated.clear_series();
            }
            tasks[idx] = updated;
            Ok(tasks)
        }
    }
}

/// Members of a series, template first, then occurrences by date.
pub fn series_members(tasks: &[Task], series_id: Uuid) -> Vec<&Task> {
    let mut members: Vec<&Task> = tasks.iter().filter(|t| t.series_id == Some(series_id)).collect();
    members.sort_by_key(|t| (t.series_role != Some(SeriesRole::Template), t.created_at));
    members
}
