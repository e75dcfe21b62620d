//! Daily and monthly work reports.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::models::{DailyReport, Label, MonthlyReport, Project, ReportStatus, Task};
use crate::views::{by_project, for_user, tasks_in_month};

/// Whether `user_id` already reported for `date`.
pub fn has_reported(reports: &[DailyReport], user_id: &str, date: NaiveDate) -> bool {
    reports.iter().any(|r| r.user_id == user_id && r.date == date)
}

/// Records the tasks `user_id` completed on `date` as that day's report.
///
/// Fails if the day was already reported or nothing was completed. Returns
/// the number of tasks reported.
pub fn submit_daily(
    reports: &mut Vec<DailyReport>,
    tasks: &[Task],
    user_id: &str,
    user_name: &str,
    date: NaiveDate,
) -> Result<usize> {
    if has_reported(reports, user_id, date) {
        return Err(Error::AlreadyReported(date));
    }
    let done: Vec<Task> = tasks
        .iter()
        .filter(|t| t.user_id == user_id && t.completed && t.date() == date)
        .cloned()
        .collect();
    if done.is_empty() {
        return Err(Error::NothingToReport(date));
    }
    let count = done.len();
    reports.push(DailyReport {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        date,
        tasks: done,
    });
    Ok(count)
}

/// Withdraws the report `user_id` made for `date`.
pub fn cancel_daily(reports: &mut Vec<DailyReport>, user_id: &str, date: NaiveDate) -> Result<()> {
    let before = reports.len();
    reports.retain(|r| !(r.user_id == user_id && r.date == date));
    if reports.len() == before {
        return Err(Error::ReportNotFound(date.to_string()));
    }
    Ok(())
}

/// A user's daily reports, newest first.
pub fn daily_history<'a>(reports: &'a [DailyReport], user_id: &str) -> Vec<&'a DailyReport> {
    let mut mine: Vec<&DailyReport> = reports.iter().filter(|r| r.user_id == user_id).collect();
    mine.sort_by(|a, b| b.date.cmp(&a.date));
    mine
}

/// Id of a user's report for a month: `<user>_<YYYY>-<MM>`.
pub fn monthly_report_id(user_id: &str, year: i32, month: u32) -> String {
    format!("{}_{:04}-{:02}", user_id, year, month)
}

/// Drafts a monthly report from the tasks completed in that month.
///
/// Tasks are grouped by project (catalog order, unassigned last) and within a
/// project by label name (unlabelled last).
pub fn generate_monthly_content(
    tasks: &[Task],
    projects: &[Project],
    labels: &[Label],
    user_id: &str,
    year: i32,
    month: u32,
) -> String {
    let mine = for_user(tasks, user_id);
    let done: Vec<&Task> = tasks_in_month(&mine, year, month).into_iter().filter(|t| t.completed).collect();
    if done.is_empty() {
        return "No tasks were completed this month.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "# Work report {:04}-{:02}\n", year, month);
    for (project, members) in by_project(&done, projects) {
        if members.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {}\n", project.map_or("Unassigned", |p| p.name.as_str()));

        let mut groups: Vec<(Option<&Label>, Vec<&Task>)> = Vec::new();
        for t in members {
            let label = t.label_id.as_deref().and_then(|id| labels.iter().find(|l| l.id == id));
            match groups.iter_mut().find(|g| g.0.map(|l| &l.id) == label.map(|l| &l.id)) {
                Some((_, list)) => list.push(t),
                None => groups.push((label, vec![t])),
            }
        }
        groups.sort_by(|(a, _), (b, _)| match (a, b) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(a), Some(b)) => a.name.cmp(&b.name),
        });

        for (label, list) in groups {
            let _ = writeln!(out, "- **@ {}**", label.map_or("Unlabelled", |l| l.name.as_str()));
            for t in list {
                let _ = writeln!(out, "  - {}", t.content);
            }
        }
        out.push('\n');
    }
    out
}

/// The stored report for the month, or a fresh draft with generated content.
pub fn open_monthly(
    reports: &[MonthlyReport],
    tasks: &[Task],
    projects: &[Project],
    labels: &[Label],
    user_id: &str,
    year: i32,
    month: u32,
) -> MonthlyReport {
    let id = monthly_report_id(user_id, year, month);
    if let Some(existing) = reports.iter().find(|r| r.id == id) {
        return existing.clone();
    }
    MonthlyReport {
        content: generate_monthly_content(tasks, projects, labels, user_id, year, month),
        id,
        user_id: user_id.to_string(),
        year,
        month,
        status: ReportStatus::Draft,
        submitted_at: None,
    }
}

/// Stores `report` with the given status, replacing any earlier version.
///
/// A submitted report can't be overwritten until its submission is cancelled.
/// Submitting stamps `submitted_at`; saving a draft keeps the previous stamp.
pub fn save_monthly(
    reports: &mut Vec<MonthlyReport>,
    mut report: MonthlyReport,
    status: ReportStatus,
    now: NaiveDateTime,
) -> Result<()> {
    let existing = reports.iter().position(|r| r.id == report.id);
    if let Some(idx) = existing {
        if reports[idx].status == ReportStatus::Submitted {
            return Err(Error::ReportSubmitted(report.id));
        }
        report.submitted_at = reports[idx].submitted_at;
    }
    report.status = status;
    if status == ReportStatus::Submitted {
        report.submitted_at = Some(now);
    }
    match existing {
        Some(idx) => reports[idx] = report,
        None => reports.push(report),
    }
    Ok(())
}

/// Moves a submitted report back to draft.
pub fn cancel_monthly_submission(reports: &mut [MonthlyReport], id: &str) -> Result<()> {
    let report = reports
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::ReportNotFound(id.to_string()))?;
    report.status = ReportStatus::Draft;
    Ok(())
}

/// Year and month of `date`, for report lookups.
pub fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
