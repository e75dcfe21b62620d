//! Read-only groupings of tasks for the dashboard, calendar, project and
//! label layouts.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Label, Project, Task};

/// Tasks owned by `user_id`.
pub fn for_user<'a>(tasks: &'a [Task], user_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.user_id == user_id).collect()
}

/// The three dashboard buckets for one day.
#[derive(Debug, Default)]
pub struct Dashboard<'a> {
    /// Scheduled today, not completed.
    pub open_today: Vec<&'a Task>,
    /// Scheduled today, completed.
    pub done_today: Vec<&'a Task>,
    /// Scheduled before today, not completed.
    pub overdue: Vec<&'a Task>,
}

pub fn dashboard<'a>(tasks: &[&'a Task], today: NaiveDate) -> Dashboard<'a> {
    let mut board = Dashboard::default();
    for &t in tasks {
        let date = t.date();
        if date == today {
            if t.completed {
                board.done_today.push(t);
            } else {
                board.open_today.push(t);
            }
        } else if date < today && !t.completed {
            board.overdue.push(t);
        }
    }
    board.overdue.sort_by_key(|t| t.created_at);
    board
}

/// Tasks scheduled on `date`: open ones first, then by time.
pub fn tasks_on<'a>(tasks: &[&'a Task], date: NaiveDate) -> Vec<&'a Task> {
    let mut day: Vec<&Task> = tasks.iter().copied().filter(|t| t.date() == date).collect();
    day.sort_by_key(|t| (t.completed, t.created_at));
    day
}

/// Tasks scheduled in the given month, any state.
pub fn tasks_in_month<'a>(tasks: &[&'a Task], year: i32, month: u32) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|t| t.created_at.year() == year && t.created_at.month() == month)
        .collect()
}

/// Calendar weeks of a month, Sunday first. Days outside the month are `None`.
///
/// Returns an empty grid for an invalid year/month.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(next_month) = first.checked_add_months(Months::new(1)) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut col = first.weekday().num_days_from_sunday() as usize;
    for date in first.iter_days().take_while(|d| *d < next_month) {
        week[col] = Some(date);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }
    weeks
}

/// Tasks grouped under each project in catalog order, then the unassigned
/// ones (including tasks pointing at unknown projects) under `None`.
pub fn by_project<'a, 'p>(tasks: &[&'a Task], projects: &'p [Project]) -> Vec<(Option<&'p Project>, Vec<&'a Task>)> {
    let mut groups: Vec<(Option<&Project>, Vec<&Task>)> = projects
        .iter()
        .map(|p| {
            let members: Vec<&Task> = tasks.iter().copied().filter(|t| t.project_id.as_deref() == Some(p.id.as_str())).collect();
            (Some(p), members)
        })
        .collect();
    let unassigned: Vec<&Task> = tasks
        .iter()
        .copied()
        .filter(|t| match &t.project_id {
            None => true,
            Some(id) => !projects.iter().any(|p| &p.id == id),
        })
        .collect();
    groups.push((None, unassigned));
    groups
}

/// Tasks grouped under each label in catalog order, then unlabelled ones.
pub fn by_label<'a, 'l>(tasks: &[&'a Task], labels: &'l [Label]) -> Vec<(Option<&'l Label>, Vec<&'a Task>)> {
    let mut groups: Vec<(Option<&Label>, Vec<&Task>)> = labels
        .iter()
        .map(|l| {
            let members: Vec<&Task> = tasks.iter().copied().filter(|t| t.label_id.as_deref() == Some(l.id.as_str())).collect();
            (Some(l), members)
        })
        .collect();
    let unlabelled: Vec<&Task> = tasks
        .iter()
        .copied()
        .filter(|t| match &t.label_id {
            None => true,
            Some(id) => !labels.iter().any(|l| &l.id == id),
        })
        .collect();
    groups.push((None, unlabelled));
    groups
}
