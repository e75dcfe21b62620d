//! # Dayplan
//!
//! A terminal task planner. Plan the day on a dashboard, browse a month
//! calendar, group work by project and label, repeat tasks on a schedule,
//! and file daily and monthly work reports.
//!
//! ## Usage
//!
//! **Adding Tasks**
//! ```bash
//! # Scheduled now
//! dayplan add "Write report" --project Work --label Important
//!
//! # On a given day
//! dayplan add "Dentist" --date 2025-12-01
//!
//! # Every weekday until the end of the month
//! dayplan add "Standup" --repeat weekdays --until 2025-12-31
//! ```
//!
//! **Managing Tasks**
//! ```bash
//! dayplan list [--all]
//! dayplan toggle <ID>
//! dayplan edit <ID> --repeat monthly --until 2026-06-30
//! dayplan edit <ID> --repeat none      # collapse a series
//! dayplan fill <ID> --from 2025-12-01 --to 2025-12-12 --weekdays
//! ```
//!
//! Task ids may be shortened to any unique prefix.
//!
//! **Views and Reports**
//! ```bash
//! dayplan dashboard
//! dayplan calendar --month 2025-12
//! dayplan report daily
//! dayplan report monthly submit --month 2025-11
//! ```
//!
//! ## Data Storage
//!
//! Data is saved as JSON in your local data directory:
//! *   Linux: `~/.local/share/dayplan/`
//! *   macOS: `~/Library/Application Support/dayplan/`
//! *   Windows: `%LOCALAPPDATA%\dayplan\`
//!
//! Override it with `DAYPLAN_HOME` or `--data-dir`. Set `RUST_LOG=dayplan=debug`
//! (or pass `-v`) to see what the planner does.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use dayplan::commands::*;
use dayplan::config::Config;
use dayplan::models::Repeat;
use dayplan::tasks::Frequency;
use dayplan::{logging, Result};

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(about = "Terminal task planner with recurring tasks and work reports", long_about = None)]
struct Cli {
    /// Data directory (overrides DAYPLAN_HOME)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Act as this user (overrides DAYPLAN_USER)
    #[arg(long, global = true)]
    user: Option<String>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        content: String,
        /// Project id or name
        #[arg(short, long)]
        project: Option<String>,
        /// Label id or name
        #[arg(short, long)]
        label: Option<String>,
        /// Scheduled day in YYYY-MM-DD (default: now)
        #[arg(short, long)]
        date: Option<String>,
        /// Repeat rule (none, daily, weekdays, monthly, yearly)
        #[arg(short, long)]
        repeat: Option<Repeat>,
        /// Last day of the series in YYYY-MM-DD
        #[arg(short, long)]
        until: Option<String>,
    },
    /// List your tasks by date
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
        /// Only tasks in this project
        #[arg(short, long)]
        project: Option<String>,
        /// Only tasks with this label
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Show a task and its series
    Show { id: String },
    /// Edit a task
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Mark a task done, or open again
    Toggle { id: String },
    /// Move a task to another day
    Move {
        id: String,
        /// New day in YYYY-MM-DD
        date: String,
    },
    /// Copy a task as a new task scheduled now
    Duplicate { id: String },
    /// Remove a task
    Remove { id: String },
    /// Copy a task onto every day of a period
    Fill {
        id: String,
        /// First day in YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// Last day in YYYY-MM-DD
        #[arg(long)]
        to: String,
        /// Skip Saturdays and Sundays
        #[arg(short, long)]
        weekdays: bool,
    },
    /// Delete every task
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Today's tasks, finished work and overdue tasks
    Dashboard,
    /// Month calendar, or one day's tasks
    Calendar {
        /// Month in YYYY-MM (default: this month)
        #[arg(short, long)]
        month: Option<String>,
        /// Show the tasks of one day (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "month")]
        day: Option<String>,
    },
    /// Open tasks grouped by project
    Projects,
    /// Open tasks grouped by label
    Labels,
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage labels
    Label {
        #[command(subcommand)]
        command: LabelCommands,
    },
    /// Daily and monthly work reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Reset the database (delete all data files)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct EditFields {
    /// New title
    #[arg(short, long)]
    content: Option<String>,
    /// New description
    #[arg(long)]
    description: Option<String>,
    /// New project id or name
    #[arg(short, long, conflicts_with = "no_project")]
    project: Option<String>,
    /// Remove the project
    #[arg(long)]
    no_project: bool,
    /// New label id or name
    #[arg(short, long, conflicts_with = "no_label")]
    label: Option<String>,
    /// Remove the label
    #[arg(long)]
    no_label: bool,
    /// New scheduled day in YYYY-MM-DD
    #[arg(short, long)]
    date: Option<String>,
    /// New repeat rule
    #[arg(short, long)]
    repeat: Option<Repeat>,
    /// New last day of the series
    #[arg(short, long, conflicts_with = "no_until")]
    until: Option<String>,
    /// Remove the series end date
    #[arg(long)]
    no_until: bool,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a project
    Add {
        name: String,
        #[arg(short, long, default_value = "sky")]
        color: String,
    },
    /// List projects
    List,
    /// Remove a project and its labels
    Remove { project: String },
    /// Remove every project
    Clear,
}

#[derive(Subcommand)]
enum LabelCommands {
    /// Add a label
    Add {
        name: String,
        #[arg(short, long, default_value = "indigo")]
        color: String,
        /// Scope the label to a project
        #[arg(short, long)]
        project: Option<String>,
    },
    /// List labels
    List {
        /// Labels usable in this project
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Remove a label
    Remove { label: String },
    /// Remove every label
    Clear,
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Report today's completed tasks
    Daily,
    /// Cancel today's report
    Cancel,
    /// List your past daily reports
    History,
    /// Monthly work report
    Monthly {
        #[command(subcommand)]
        command: MonthlyCommands,
    },
}

#[derive(Subcommand)]
enum MonthlyCommands {
    /// Print the report (drafted from completed tasks if new)
    Show {
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Save the report as a draft
    Save {
        #[arg(short, long)]
        month: Option<String>,
        /// Report body
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the report body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Submit the report
    Submit {
        #[arg(short, long)]
        month: Option<String>,
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Return a submitted report to draft
    Unsubmit {
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Add { content, project, label, date, repeat, until } => {
            cmd_add(ctx, content, project, label, date, repeat, until).map(|_| ())
        }
        Commands::List { all, project, label } => cmd_list(ctx, all, project, label),
        Commands::Show { id } => cmd_show(ctx, &id),
        Commands::Edit { id, fields } => cmd_edit(
            ctx,
            &id,
            EditArgs {
                content: fields.content,
                description: fields.description,
                project: fields.project,
                no_project: fields.no_project,
                label: fields.label,
                no_label: fields.no_label,
                date: fields.date,
                repeat: fields.repeat,
                until: fields.until,
                no_until: fields.no_until,
            },
        ),
        Commands::Toggle { id } => cmd_toggle(ctx, &id),
        Commands::Move { id, date } => cmd_move(ctx, &id, &date),
        Commands::Duplicate { id } => cmd_duplicate(ctx, &id).map(|_| ()),
        Commands::Remove { id } => cmd_remove(ctx, &id),
        Commands::Fill { id, from, to, weekdays } => {
            let frequency = if weekdays { Frequency::Weekdays } else { Frequency::Daily };
            cmd_fill(ctx, &id, &from, &to, frequency).map(|_| ())
        }
        Commands::Clear { force } => cmd_clear_tasks(ctx, force),
        Commands::Dashboard => cmd_dashboard(ctx),
        Commands::Calendar { month, day } => cmd_calendar(ctx, month, day),
        Commands::Projects => cmd_projects(ctx),
        Commands::Labels => cmd_labels(ctx),
        Commands::Project { command } => match command {
            ProjectCommands::Add { name, color } => cmd_project_add(ctx, name, color),
            ProjectCommands::List => cmd_project_list(ctx),
            ProjectCommands::Remove { project } => cmd_project_remove(ctx, &project),
            ProjectCommands::Clear => cmd_project_clear(ctx),
        },
        Commands::Label { command } => match command {
            LabelCommands::Add { name, color, project } => cmd_label_add(ctx, name, color, project),
            LabelCommands::List { project } => cmd_label_list(ctx, project),
            LabelCommands::Remove { label } => cmd_label_remove(ctx, &label),
            LabelCommands::Clear => cmd_label_clear(ctx),
        },
        Commands::Report { command } => match command {
            ReportCommands::Daily => cmd_report_daily(ctx).map(|_| ()),
            ReportCommands::Cancel => cmd_report_cancel(ctx),
            ReportCommands::History => cmd_report_history(ctx),
            ReportCommands::Monthly { command } => match command {
                MonthlyCommands::Show { month } => cmd_monthly_show(ctx, month),
                MonthlyCommands::Save { month, content, file } => {
                    cmd_monthly_save(ctx, month, content, file.as_deref(), false)
                }
                MonthlyCommands::Submit { month, content, file } => {
                    cmd_monthly_save(ctx, month, content, file.as_deref(), true)
                }
                MonthlyCommands::Unsubmit { month } => cmd_monthly_unsubmit(ctx, month),
            },
        },
        Commands::Reset { force } => cmd_reset(ctx, force),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "dayplan", &mut io::stdout());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::from_env().with_overrides(cli.data_dir, cli.user);
    tracing::debug!(data_dir = %config.data_dir.display(), user = %config.user_id, "resolved config");

    let result = Context::new(config).and_then(|ctx| run(&ctx, cli.command.unwrap_or(Commands::Dashboard)));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
