use std::io::{self, Write};
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{self, find_label, find_project};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{at_noon, short_id, Label, Project, ReportStatus, Repeat, SeriesRole, Task, TaskUpdate};
use crate::recurrence::{apply_update, series_members};
use crate::reports;
use crate::storage::Store;
use crate::tasks::{self, resolve_id, Frequency};
use crate::views::{self, for_user};

/// Everything a command needs: where data lives, who is acting, and when.
pub struct Context {
    pub store: Store,
    pub config: Config,
    /// Moment the command runs at; fixed in tests.
    pub now: NaiveDateTime,
    /// Suppresses all stdout output.
    pub silent: bool,
}

impl Context {
    pub fn new(config: Config) -> Result<Context> {
        let store = Store::open(&config.data_dir)?;
        Ok(Context { store, config, now: Local::now().naive_local(), silent: false })
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn say(&self, msg: impl AsRef<str>) {
        if !self.silent {
            println!("{}", msg.as_ref());
        }
    }

    fn user(&self) -> &str {
        &self.config.user_id
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| Error::InvalidDate {
        input: s.to_string(),
        reason: format!("{}. Use YYYY-MM-DD", e),
    })
}

/// Parses a `YYYY-MM` month into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").map_err(|e| Error::InvalidDate {
        input: s.to_string(),
        reason: format!("{}. Use YYYY-MM", e),
    })?;
    Ok(reports::month_of(date))
}

fn project_name(projects: &[Project], id: Option<&str>) -> String {
    id.and_then(|id| projects.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

fn label_name(labels: &[Label], id: Option<&str>) -> String {
    id.and_then(|id| labels.iter().find(|l| l.id == id))
        .map(|l| l.name.clone())
        .unwrap_or_default()
}

fn repeat_cell(t: &Task) -> String {
    match (t.repeat, t.repeat_until) {
        (Repeat::None, _) => String::new(),
        (r, Some(until)) => {
            let marker = if t.series_role == Some(SeriesRole::Template) { "*" } else { "" };
            format!("{}{} until {}", r, marker, until)
        }
        (r, None) => format!("{} (no end date)", r),
    }
}

fn task_table(tasks: &[&Task], projects: &[Project], labels: &[Label], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("Label").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Repeat").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let overdue = !t.completed && t.date() < today;
        let date_color = if overdue {
            Color::Red
        } else if t.date() == today {
            Color::Yellow
        } else {
            Color::Reset
        };
        let status = if t.completed { "Done" } else { "Open" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(t.short_id()),
            Cell::new(&t.content),
            Cell::new(project_name(projects, t.project_id.as_deref())),
            Cell::new(label_name(labels, t.label_id.as_deref())),
            Cell::new(t.date()).fg(date_color),
            Cell::new(repeat_cell(t)),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

/// Loads tasks, runs `f` on them and saves the result.
fn with_tasks<T>(ctx: &Context, f: impl FnOnce(Vec<Task>) -> Result<(Vec<Task>, T)>) -> Result<T> {
    let tasks = ctx.store.load_tasks();
    let (tasks, out) = f(tasks)?;
    ctx.store.save_tasks(&tasks)?;
    Ok(out)
}

fn resolve_project(ctx: &Context, key: Option<String>) -> Result<Option<String>> {
    match key {
        None => Ok(None),
        Some(key) => Ok(Some(find_project(&ctx.store.load_projects(), &key)?.id.clone())),
    }
}

fn resolve_label(ctx: &Context, key: Option<String>) -> Result<Option<String>> {
    match key {
        None => Ok(None),
        Some(key) => Ok(Some(find_label(&ctx.store.load_labels(), &key)?.id.clone())),
    }
}

/// Adds a new task, optionally starting a recurring series right away.
///
/// Without `date` the task is scheduled now.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    ctx: &Context,
    content: String,
    project: Option<String>,
    label: Option<String>,
    date: Option<String>,
    repeat: Option<Repeat>,
    until: Option<String>,
) -> Result<Uuid> {
    let created_at = match date {
        Some(d) => at_noon(parse_date(&d)?),
        None => ctx.now,
    };
    let project_id = resolve_project(ctx, project)?;
    let label_id = resolve_label(ctx, label)?;
    if let Some(l) = &label_id {
        catalog::check_label_scope(&ctx.store.load_labels(), l, project_id.as_deref())?;
    }
    let until = until.map(|u| parse_date(&u)).transpose()?;

    let id = with_tasks(ctx, |mut tasks| {
        let id = tasks::add_task(&mut tasks, &content, project_id, label_id, ctx.user(), created_at);
        if let Some(repeat) = repeat.filter(|r| r.is_recurring()) {
            let update = TaskUpdate { repeat: Some(repeat), repeat_until: Some(until), ..TaskUpdate::default() };
            tasks = apply_update(tasks, id, &update)?;
        }
        Ok((tasks, id))
    })?;
    info!(task = %id, "task added");
    ctx.say(format!("Task added (id = {})", short_id(id)));
    if repeat.is_some_and(|r| r.is_recurring()) && until.is_none() {
        hint_pending_rule(ctx);
    }
    Ok(id)
}

fn hint_pending_rule(ctx: &Context) {
    ctx.say("The repeat rule has no end date yet; set one with --until to generate the series.");
}

/// Lists the current user's tasks by date. Completed tasks are hidden
/// unless `all` is set.
pub fn cmd_list(ctx: &Context, all: bool, project: Option<String>, label: Option<String>) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let project_id = project.map(|p| find_project(&projects, &p).map(|p| p.id.clone())).transpose()?;
    let label_id = label.map(|l| find_label(&labels, &l).map(|l| l.id.clone())).transpose()?;

    let mut mine = for_user(&tasks, ctx.user());
    mine.retain(|t| all || !t.completed);
    if let Some(p) = &project_id {
        mine.retain(|t| t.project_id.as_ref() == Some(p));
    }
    if let Some(l) = &label_id {
        mine.retain(|t| t.label_id.as_ref() == Some(l));
    }
    if mine.is_empty() {
        ctx.say("No tasks found.");
        return Ok(());
    }
    mine.sort_by_key(|t| (t.created_at, t.completed));
    ctx.say(task_table(&mine, &projects, &labels, ctx.today()).to_string());
    Ok(())
}

/// Prints one task and, for a recurring one, its series.
pub fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let id = resolve_id(&tasks, id)?;
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        return Err(Error::TaskNotFound(id.to_string()));
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec!["ID".to_string(), task.id.to_string()]);
    table.add_row(vec!["Task".to_string(), task.content.clone()]);
    table.add_row(vec!["Description".to_string(), task.description.clone()]);
    table.add_row(vec!["Project".to_string(), project_name(&projects, task.project_id.as_deref())]);
    table.add_row(vec!["Label".to_string(), label_name(&labels, task.label_id.as_deref())]);
    table.add_row(vec!["Scheduled".to_string(), task.created_at.format("%Y-%m-%d %H:%M").to_string()]);
    table.add_row(vec!["Status".to_string(), if task.completed { "Done" } else { "Open" }.to_string()]);
    table.add_row(vec!["Repeat".to_string(), repeat_cell(task)]);
    ctx.say(table.to_string());

    if let Some(series_id) = task.series_id {
        let members = series_members(&tasks, series_id);
        ctx.say(format!("Series {} ({} tasks)", short_id(series_id), members.len()));
        ctx.say(task_table(&members, &projects, &labels, ctx.today()).to_string());
    }
    Ok(())
}

/// Requested edits, as given on the command line.
#[derive(Debug, Default)]
pub struct EditArgs {
    pub content: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub no_project: bool,
    pub label: Option<String>,
    pub no_label: bool,
    pub date: Option<String>,
    pub repeat: Option<Repeat>,
    pub until: Option<String>,
    pub no_until: bool,
}

/// Edits a task through the series-aware update path.
pub fn cmd_edit(ctx: &Context, id: &str, args: EditArgs) -> Result<()> {
    let mut update = TaskUpdate {
        content: args.content,
        description: args.description,
        repeat: args.repeat,
        ..TaskUpdate::default()
    };
    if args.no_project {
        update.project_id = Some(None);
    } else if let Some(p) = resolve_project(ctx, args.project)? {
        update.project_id = Some(Some(p));
    }
    if args.no_label {
        update.label_id = Some(None);
    } else if let Some(l) = resolve_label(ctx, args.label)? {
        update.label_id = Some(Some(l));
    }
    if let Some(d) = args.date {
        update.created_at = Some(at_noon(parse_date(&d)?));
    }
    if args.no_until {
        update.repeat_until = Some(None);
    } else if let Some(u) = args.until {
        update.repeat_until = Some(Some(parse_date(&u)?));
    }
    if update.repeat == Some(Repeat::None) {
        update.repeat_until = Some(None);
    }
    if update.is_empty() {
        ctx.say("Nothing to change.");
        return Ok(());
    }

    let labels = ctx.store.load_labels();
    let (short, pending) = with_tasks(ctx, |tasks| {
        let id = resolve_id(&tasks, id)?;
        let task = tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let project = update.project_id.clone().unwrap_or_else(|| task.project_id.clone());
        if let Some(Some(l)) = &update.label_id {
            catalog::check_label_scope(&labels, l, project.as_deref())?;
        } else if update.label_id.is_none() {
            // A new project drops a label scoped to the old one.
            let stale = task
                .label_id
                .as_deref()
                .is_some_and(|l| catalog::check_label_scope(&labels, l, project.as_deref()).is_err());
            if stale {
                update.label_id = Some(None);
            }
        }

        let tasks = apply_update(tasks, id, &update)?;
        let (short, pending) = tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| (t.short_id(), t.repeat.is_recurring() && t.repeat_until.is_none()))
            .unwrap_or_default();
        Ok((tasks, (short, pending)))
    })?;
    ctx.say(format!("Task {} updated.", short));
    if pending {
        hint_pending_rule(ctx);
    }
    Ok(())
}

/// Marks a task done, or open again.
pub fn cmd_toggle(ctx: &Context, id: &str) -> Result<()> {
    let (short, completed) = with_tasks(ctx, |mut tasks| {
        let id = resolve_id(&tasks, id)?;
        let completed = tasks::toggle_task(&mut tasks, id)?;
        Ok((tasks, (short_id(id), completed)))
    })?;
    if completed {
        ctx.say(format!("Task {} marked as done.", short));
    } else {
        ctx.say(format!("Task {} reopened.", short));
    }
    Ok(())
}

/// Reschedules a single task to another day. Series siblings stay put.
pub fn cmd_move(ctx: &Context, id: &str, date: &str) -> Result<()> {
    let to = at_noon(parse_date(date)?);
    with_tasks(ctx, |mut tasks| {
        let id = resolve_id(&tasks, id)?;
        tasks::move_task(&mut tasks, id, to)?;
        Ok((tasks, ()))
    })?;
    ctx.say(format!("Task moved to {}.", to.date()));
    Ok(())
}

pub fn cmd_duplicate(ctx: &Context, id: &str) -> Result<Uuid> {
    let new_id = with_tasks(ctx, |mut tasks| {
        let id = resolve_id(&tasks, id)?;
        let new_id = tasks::duplicate_task(&mut tasks, id, ctx.user(), ctx.now)?;
        Ok((tasks, new_id))
    })?;
    ctx.say(format!("Task duplicated (id = {})", short_id(new_id)));
    Ok(new_id)
}

pub fn cmd_remove(ctx: &Context, id: &str) -> Result<()> {
    let removed = with_tasks(ctx, |mut tasks| {
        let id = resolve_id(&tasks, id)?;
        let removed = tasks::delete_task(&mut tasks, id)?;
        Ok((tasks, removed))
    })?;
    info!(task = %removed.id, "task removed");
    ctx.say(format!("Task {} removed.", removed.short_id()));
    Ok(())
}

/// Copies a task onto each day of a period.
pub fn cmd_fill(ctx: &Context, id: &str, start: &str, end: &str, frequency: Frequency) -> Result<usize> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    let added = with_tasks(ctx, |mut tasks| {
        let id = resolve_id(&tasks, id)?;
        let added = tasks::fill_period(&mut tasks, id, start, end, frequency)?;
        Ok((tasks, added))
    })?;
    if added > 0 {
        ctx.say(format!("{} tasks created.", added));
    } else {
        ctx.say("No tasks to create in that period.");
    }
    Ok(added)
}

/// Shows today's open and finished tasks plus anything overdue.
pub fn cmd_dashboard(ctx: &Context) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let daily = ctx.store.load_daily_reports();
    let mine = for_user(&tasks, ctx.user());
    let today = ctx.today();
    let board = views::dashboard(&mine, today);

    let sections = [
        ("Today", &board.open_today, "Nothing left for today!"),
        ("Done today", &board.done_today, "Nothing finished yet."),
        ("Overdue", &board.overdue, "Nothing overdue."),
    ];
    for (title, list, empty) in sections {
        ctx.say(format!("{} ({})", title, list.len()));
        if list.is_empty() {
            ctx.say(format!("  {}", empty));
        } else {
            ctx.say(task_table(list, &projects, &labels, today).to_string());
        }
    }
    if reports::has_reported(&daily, ctx.user(), today) {
        ctx.say("Today's report: submitted");
    } else {
        ctx.say("Today's report: not yet submitted");
    }
    Ok(())
}

/// Prints a month grid with task counts, or one day's tasks.
pub fn cmd_calendar(ctx: &Context, month: Option<String>, day: Option<String>) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let mine = for_user(&tasks, ctx.user());

    if let Some(day) = day {
        let date = parse_date(&day)?;
        let list = views::tasks_on(&mine, date);
        if list.is_empty() {
            ctx.say(format!("No tasks on {}.", date));
        } else {
            let projects = ctx.store.load_projects();
            let labels = ctx.store.load_labels();
            ctx.say(task_table(&list, &projects, &labels, ctx.today()).to_string());
        }
        return Ok(());
    }

    let (year, month) = match month {
        Some(m) => parse_month(&m)?,
        None => reports::month_of(ctx.today()),
    };
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    for week in views::month_grid(year, month) {
        table.add_row(week.iter().map(|slot| match slot {
            None => Cell::new(""),
            Some(date) => {
                let on_day = views::tasks_on(&mine, *date);
                let open = on_day.iter().filter(|t| !t.completed).count();
                let text = if on_day.is_empty() {
                    format!("{:>2}", date.format("%d"))
                } else {
                    format!("{:>2}\n{}/{}", date.format("%d"), on_day.len() - open, on_day.len())
                };
                let cell = Cell::new(text);
                if *date == ctx.today() {
                    cell.add_attribute(Attribute::Bold).fg(Color::Cyan)
                } else if open > 0 && *date < ctx.today() {
                    cell.fg(Color::Red)
                } else {
                    cell
                }
            }
        }));
    }
    ctx.say(format!("{:04}-{:02} (done/total)", year, month));
    ctx.say(table.to_string());
    Ok(())
}

/// Prints open tasks grouped by project.
pub fn cmd_projects(ctx: &Context) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let mine: Vec<&Task> = for_user(&tasks, ctx.user()).into_iter().filter(|t| !t.completed).collect();
    for (project, list) in views::by_project(&mine, &projects) {
        let name = project.map_or("Unassigned", |p| p.name.as_str());
        ctx.say(format!("# {} ({})", name, list.len()));
        if !list.is_empty() {
            ctx.say(task_table(&list, &projects, &labels, ctx.today()).to_string());
        }
    }
    Ok(())
}

/// Prints open tasks grouped by label.
pub fn cmd_labels(ctx: &Context) -> Result<()> {
    let tasks = ctx.store.load_tasks();
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let mine: Vec<&Task> = for_user(&tasks, ctx.user()).into_iter().filter(|t| !t.completed).collect();
    for (label, list) in views::by_label(&mine, &labels) {
        let name = label.map_or("Unlabelled", |l| l.name.as_str());
        ctx.say(format!("@ {} ({})", name, list.len()));
        if !list.is_empty() {
            ctx.say(task_table(&list, &projects, &labels, ctx.today()).to_string());
        }
    }
    Ok(())
}

/// Clears task references to projects or labels that were removed.
fn prune_refs(ctx: &Context, projects: &[Project], labels: &[Label]) -> Result<()> {
    let mut tasks = ctx.store.load_tasks();
    let changed = tasks::prune_dangling_refs(&mut tasks, projects, labels);
    if changed > 0 {
        debug!(changed, "cleared dangling task references");
        ctx.store.save_tasks(&tasks)?;
    }
    Ok(())
}

pub fn cmd_project_add(ctx: &Context, name: String, color: String) -> Result<()> {
    let mut projects = ctx.store.load_projects();
    let id = catalog::add_project(&mut projects, &name, &color);
    ctx.store.save_projects(&projects)?;
    ctx.say(format!("Project '{}' added ({}).", name, id));
    Ok(())
}

pub fn cmd_project_remove(ctx: &Context, key: &str) -> Result<()> {
    let mut projects = ctx.store.load_projects();
    let mut labels = ctx.store.load_labels();
    let (removed, dropped) = catalog::remove_project(&mut projects, &mut labels, key)?;
    ctx.store.save_projects(&projects)?;
    ctx.store.save_labels(&labels)?;
    prune_refs(ctx, &projects, &labels)?;
    ctx.say(format!("Project '{}' removed ({} labels removed with it).", removed.name, dropped));
    Ok(())
}

pub fn cmd_project_clear(ctx: &Context) -> Result<()> {
    let mut projects = ctx.store.load_projects();
    let mut labels = ctx.store.load_labels();
    catalog::clear_projects(&mut projects, &mut labels);
    ctx.store.save_projects(&projects)?;
    ctx.store.save_labels(&labels)?;
    prune_refs(ctx, &projects, &labels)?;
    ctx.say("All projects removed.");
    Ok(())
}

pub fn cmd_project_list(ctx: &Context) -> Result<()> {
    let projects = ctx.store.load_projects();
    if projects.is_empty() {
        ctx.say("No projects found.");
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name", "Color"]);
    for p in projects {
        table.add_row(vec![p.id, p.name, p.color]);
    }
    ctx.say(table.to_string());
    Ok(())
}

pub fn cmd_label_add(ctx: &Context, name: String, color: String, project: Option<String>) -> Result<()> {
    let project_id = resolve_project(ctx, project)?;
    let mut labels = ctx.store.load_labels();
    let id = catalog::add_label(&mut labels, &name, &color, project_id);
    ctx.store.save_labels(&labels)?;
    ctx.say(format!("Label '{}' added ({}).", name, id));
    Ok(())
}

pub fn cmd_label_remove(ctx: &Context, key: &str) -> Result<()> {
    let projects = ctx.store.load_projects();
    let mut labels = ctx.store.load_labels();
    let removed = catalog::remove_label(&mut labels, key)?;
    ctx.store.save_labels(&labels)?;
    prune_refs(ctx, &projects, &labels)?;
    ctx.say(format!("Label '{}' removed.", removed.name));
    Ok(())
}

pub fn cmd_label_clear(ctx: &Context) -> Result<()> {
    let projects = ctx.store.load_projects();
    ctx.store.save_labels(&[])?;
    prune_refs(ctx, &projects, &[])?;
    ctx.say("All labels removed.");
    Ok(())
}

pub fn cmd_label_list(ctx: &Context, project: Option<String>) -> Result<()> {
    let projects = ctx.store.load_projects();
    let labels = ctx.store.load_labels();
    let shown: Vec<&Label> = match project {
        Some(p) => {
            let id = find_project(&projects, &p)?.id.clone();
            catalog::labels_for_project(&labels, Some(id.as_str()))
        }
        None => labels.iter().collect(),
    };
    if shown.is_empty() {
        ctx.say("No labels found.");
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name", "Color", "Project"]);
    for l in shown {
        let scope = l.project_id.as_deref().map_or_else(|| "-".to_string(), |id| project_name(&projects, Some(id)));
        table.add_row(vec![l.id.clone(), l.name.clone(), l.color.clone(), scope]);
    }
    ctx.say(table.to_string());
    Ok(())
}

/// Reports today's completed tasks.
pub fn cmd_report_daily(ctx: &Context) -> Result<usize> {
    let tasks = ctx.store.load_tasks();
    let mut daily = ctx.store.load_daily_reports();
    let count = reports::submit_daily(&mut daily, &tasks, ctx.user(), &ctx.config.user_name, ctx.today())?;
    ctx.store.save_daily_reports(&daily)?;
    info!(count, "daily report submitted");
    ctx.say(format!("Reported {} completed tasks for {}.", count, ctx.today()));
    Ok(count)
}

pub fn cmd_report_cancel(ctx: &Context) -> Result<()> {
    let mut daily = ctx.store.load_daily_reports();
    reports::cancel_daily(&mut daily, ctx.user(), ctx.today())?;
    ctx.store.save_daily_reports(&daily)?;
    ctx.say("Today's report was cancelled.");
    Ok(())
}

pub fn cmd_report_history(ctx: &Context) -> Result<()> {
    let daily = ctx.store.load_daily_reports();
    let mine = reports::daily_history(&daily, ctx.user());
    if mine.is_empty() {
        ctx.say("No reports found.");
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Date", "Tasks"]);
    for r in mine {
        let names: Vec<&str> = r.tasks.iter().map(|t| t.content.as_str()).collect();
        table.add_row(vec![r.date.to_string(), names.join("\n")]);
    }
    ctx.say(table.to_string());
    Ok(())
}

fn resolve_report_month(ctx: &Context, month: Option<String>) -> Result<(i32, u32)> {
    match month {
        Some(m) => parse_month(&m),
        None => Ok(reports::month_of(ctx.today())),
    }
}

/// Prints the month's report, drafting it from completed tasks if none is stored.
pub fn cmd_monthly_show(ctx: &Context, month: Option<String>) -> Result<()> {
    let (year, month) = resolve_report_month(ctx, month)?;
    let report = reports::open_monthly(
        &ctx.store.load_monthly_reports(),
        &ctx.store.load_tasks(),
        &ctx.store.load_projects(),
        &ctx.store.load_labels(),
        ctx.user(),
        year,
        month,
    );
    let status = match report.status {
        ReportStatus::Draft => "draft".to_string(),
        ReportStatus::Submitted => match report.submitted_at {
            Some(at) => format!("submitted {}", at.format("%Y-%m-%d %H:%M")),
            None => "submitted".to_string(),
        },
    };
    ctx.say(format!("[{}] {}", report.id, status));
    ctx.say(report.content);
    Ok(())
}

/// Saves the month's report as a draft, or submits it.
///
/// The body comes from `content`, else from `file`, else the stored or
/// generated draft is kept as is.
pub fn cmd_monthly_save(
    ctx: &Context,
    month: Option<String>,
    content: Option<String>,
    file: Option<&Path>,
    submit: bool,
) -> Result<()> {
    let (year, month) = resolve_report_month(ctx, month)?;
    let mut stored = ctx.store.load_monthly_reports();
    let mut report = reports::open_monthly(
        &stored,
        &ctx.store.load_tasks(),
        &ctx.store.load_projects(),
        &ctx.store.load_labels(),
        ctx.user(),
        year,
        month,
    );
    if let Some(text) = content {
        report.content = text;
    } else if let Some(path) = file {
        report.content = std::fs::read_to_string(path)?;
    }
    let id = report.id.clone();
    let status = if submit { ReportStatus::Submitted } else { ReportStatus::Draft };
    reports::save_monthly(&mut stored, report, status, ctx.now)?;
    ctx.store.save_monthly_reports(&stored)?;
    if submit {
        ctx.say(format!("Report {} submitted.", id));
    } else {
        ctx.say(format!("Report {} saved as draft.", id));
    }
    Ok(())
}

pub fn cmd_monthly_unsubmit(ctx: &Context, month: Option<String>) -> Result<()> {
    let (year, month) = resolve_report_month(ctx, month)?;
    let id = reports::monthly_report_id(ctx.user(), year, month);
    let mut stored = ctx.store.load_monthly_reports();
    reports::cancel_monthly_submission(&mut stored, &id)?;
    ctx.store.save_monthly_reports(&stored)?;
    ctx.say(format!("Report {} is a draft again.", id));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Deletes every task, for every user.
pub fn cmd_clear_tasks(ctx: &Context, force: bool) -> Result<()> {
    if !force && !confirm("Delete all tasks? This cannot be undone.")? {
        ctx.say("Aborted.");
        return Ok(());
    }
    ctx.store.save_tasks(&[])?;
    ctx.say("All tasks deleted.");
    Ok(())
}

/// Deletes every data file.
pub fn cmd_reset(ctx: &Context, force: bool) -> Result<()> {
    if !force && !confirm("Delete all tasks, projects, labels and reports? This cannot be undone.")? {
        ctx.say("Aborted.");
        return Ok(());
    }
    ctx.store.delete_all()?;
    ctx.say("Database reset successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_and_months_parse() {
        assert_eq!(parse_date("2024-01-26").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 26).unwrap());
        assert!(matches!(parse_date("26/01/2024"), Err(Error::InvalidDate { .. })));
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
    }
}
