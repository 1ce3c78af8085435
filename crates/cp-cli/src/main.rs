//! Capacity Planner command line
//!
//! Reads a JSON snapshot of employees and tasks and prints upcoming
//! occurrences, daily workload or an employee x date grid.
//!
//! ```bash
//! capacity-planner occurrences --snapshot team.json --task <ID> --limit 5
//! capacity-planner workload --snapshot team.json --from 2024-02-05 --to 2024-02-09 --employee <ID>
//! capacity-planner grid --snapshot team.json --reference 2024-02-07 --view week
//! capacity-planner except --snapshot team.json --task <ID> --date 2024-02-07 --remove --write
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use cp_core::calendar::{parse_date, DateRange};
use cp_core::config::{LoggingConfig, PlannerConfig};
use cp_core::traits::Id;
use cp_models::{ExceptionEdit, TaskRecord};
use cp_schedule::ViewWindow;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cp_cli::commands;
use cp_cli::render;
use cp_cli::Snapshot;

#[derive(Parser)]
#[command(name = "capacity-planner", version)]
#[command(about = "Recurring task occurrences and team workload", long_about = None)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SnapshotArgs {
    /// JSON file with `employees` and `tasks`
    #[arg(short, long)]
    snapshot: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List the next occurrences of one task
    Occurrences {
        #[command(flatten)]
        input: SnapshotArgs,
        #[arg(short, long)]
        task: Id,
        /// First date to look at (YYYY-MM-DD), today if omitted
        #[arg(short, long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        /// How many occurrences to list
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Daily hours, capacity and utilization
    Workload {
        #[command(flatten)]
        input: SnapshotArgs,
        /// Single date (YYYY-MM-DD), today if no range is given
        #[arg(short, long, value_parser = date_arg, conflicts_with_all = ["from", "to"])]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg, requires = "from")]
        to: Option<NaiveDate>,
        /// Restrict to one employee; the whole team otherwise
        #[arg(short, long)]
        employee: Option<Id>,
        #[arg(long)]
        json: bool,
    },
    /// Employee x date workload grid for a day, week or month
    Grid {
        #[command(flatten)]
        input: SnapshotArgs,
        /// Date the view is built around, today if omitted
        #[arg(short, long, value_parser = date_arg)]
        reference: Option<NaiveDate>,
        #[arg(short, long, default_value = "week")]
        view: ViewWindow,
        #[arg(long)]
        json: bool,
    },
    /// Record a per-date change to a weekly task
    Except {
        #[command(flatten)]
        input: SnapshotArgs,
        #[arg(short, long)]
        task: Id,
        #[arg(short, long, value_parser = date_arg)]
        date: NaiveDate,
        /// Drop the occurrence on this date
        #[arg(long, conflicts_with_all = ["hours", "assignee"])]
        remove: bool,
        /// Hours for this date only
        #[arg(short = 'H', long)]
        hours: Option<f64>,
        /// Employee for this date only, or `none` to leave it unassigned
        #[arg(short, long)]
        assignee: Option<String>,
        /// Save the updated snapshot back to the file
        #[arg(short, long)]
        write: bool,
    },
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date("date", value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = PlannerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging);

    // Only the binary reads the clock; everything below takes explicit dates.
    let today = Utc::now().date_naive();
    let date_format = config.calendar.date_format.as_str();

    match cli.command {
        Commands::Occurrences {
            input,
            task,
            from,
            limit,
            json,
        } => {
            let snapshot = load_snapshot(&input)?;
            let report = commands::occurrences(
                &snapshot,
                task,
                from.unwrap_or(today),
                limit,
                &config.limits,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.title);
                println!("{}", render::occurrences_table(&report, &snapshot.roster, date_format));
            }
        }
        Commands::Workload {
            input,
            date,
            from,
            to,
            employee,
            json,
        } => {
            let range = match (from, to) {
                (Some(from), Some(to)) => DateRange::new(from, to)?,
                _ => DateRange::single(date.unwrap_or(today)),
            };
            let snapshot = load_snapshot(&input)?;
            let report = commands::workload(&snapshot, range, employee, &config.limits)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} {}", report.row.label, report.range);
                println!("{}", render::workload_table(&report, date_format));
            }
        }
        Commands::Grid {
            input,
            reference,
            view,
            json,
        } => {
            let snapshot = load_snapshot(&input)?;
            let grid = commands::grid(&snapshot, reference.unwrap_or(today), view, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                println!("{}", render::grid_table(&grid, date_format));
            }
        }
        Commands::Except {
            input,
            task,
            date,
            remove,
            hours,
            assignee,
            write,
        } => {
            let edit = exception_edit(date, remove, hours, assignee.as_deref())?;
            let mut snapshot = load_snapshot(&input)?;
            let updated = commands::edit_exception(&mut snapshot, task, edit)?;

            if write {
                let text = serde_json::to_string_pretty(&snapshot.to_file())?;
                fs::write(&input.snapshot, text)
                    .with_context(|| format!("writing {}", input.snapshot.display()))?;
                info!(path = %input.snapshot.display(), "Snapshot saved");
            }
            println!("{}", serde_json::to_string_pretty(&TaskRecord::from(updated))?);
        }
    }

    Ok(())
}

fn exception_edit(
    date: NaiveDate,
    remove: bool,
    hours: Option<f64>,
    assignee: Option<&str>,
) -> Result<ExceptionEdit> {
    if remove {
        return Ok(ExceptionEdit::remove(date));
    }

    let mut edit = match assignee {
        Some(value) if value.eq_ignore_ascii_case("none") => ExceptionEdit::reassign(date, None),
        Some(value) => {
            let id: Id = value
                .parse()
                .with_context(|| format!("'{}' is not an employee id", value))?;
            ExceptionEdit::reassign(date, Some(id))
        }
        None => match hours {
            Some(hours) => ExceptionEdit::set_hours(date, hours),
            None => anyhow::bail!("pass --remove, --hours or --assignee"),
        },
    };
    if let (Some(hours), Some(_)) = (hours, assignee) {
        edit = edit.with_hours(hours);
    }
    Ok(edit)
}

fn load_snapshot(args: &SnapshotArgs) -> Result<Snapshot> {
    let snapshot = Snapshot::load(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;
    for finding in snapshot.audit() {
        warn!(%finding, "Snapshot check");
    }
    Ok(snapshot)
}

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
