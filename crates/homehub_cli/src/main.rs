//! Command-line front-end for the household core.
//!
//! # Responsibility
//! - Build a `HubConfig` from flags and environment.
//! - Open storage, load the state cache and run one subcommand.
//!
//! # Invariants
//! - A database that cannot be opened ends the process with a non-zero exit
//!   code before any subcommand runs.

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use homehub_core::db::migrations::latest_version;
use homehub_core::db::Connection;
use homehub_core::state::projection::{
    calendar_events, dashboard, journal_timeline, list_detail, shopping_overview,
};
use homehub_core::{
    core_version, default_log_level, DbLocation, HubConfig, HubService, JournalDraft, RecordId,
    Navigation, RecordRepository, Snapshot, SqliteRecordRepository, TaskDraft, TaskType, View,
};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "homehub")]
#[command(about = "Household organizer: tasks, shopping lists, family and journal")]
struct Cli {
    /// Database file, created on first run
    #[arg(long, env = "HOMEHUB_DB", default_value = homehub_core::db::DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Use a throwaway in-memory database instead of --db
    #[arg(long)]
    in_memory: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HOMEHUB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "HOMEHUB_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Skip inserting default stores into an empty database
    #[arg(long)]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and report its schema version
    Init,
    /// Insert a JSON record into a collection by name
    Add { collection: String, record: String },
    /// Upsert a JSON record; an `id` field selects the row to overwrite
    Put { collection: String, record: String },
    /// Print one record by id
    Get { collection: String, id: RecordId },
    /// Print a collection, or the whole snapshot when none is given
    List { collection: Option<String> },
    /// Create or edit a task
    Task {
        name: String,
        #[arg(long, value_parser = parse_task_type, default_value = "Appointment")]
        kind: TaskType,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// HH:MM; omit for a daily task
        #[arg(long, value_parser = parse_clock_time)]
        time: Option<NaiveTime>,
        #[arg(long)]
        assignee: Option<String>,
        /// Existing task to overwrite
        #[arg(long)]
        id: Option<RecordId>,
    },
    /// Add a family member
    Member {
        name: String,
        #[arg(long)]
        birthday: Option<NaiveDate>,
    },
    /// Open a store's list, creating the store when missing
    Store { name: String },
    /// Add an item to a store's list
    Item { store_id: RecordId, name: String },
    /// Mark a shopping item completed, or not with --undo
    Toggle {
        id: RecordId,
        #[arg(long)]
        undo: bool,
    },
    /// Write a journal entry dated today
    Journal {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Task to link the entry to
        #[arg(long)]
        task_id: Option<RecordId>,
        /// Existing entry to overwrite
        #[arg(long)]
        id: Option<RecordId>,
    },
    /// Show the day view with tasks and shopping counts
    Dashboard {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Render a view by route name (dashboard, shopping, list-detail,
    /// calendar, journal)
    Show {
        view: String,
        /// Store shown by list-detail
        #[arg(long)]
        store_id: Option<RecordId>,
        /// Day shown by dashboard; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print crate and schema versions
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Version) {
        println!("homehub_core version={}", core_version());
        println!("schema version={}", latest_version());
        return ExitCode::SUCCESS;
    }

    let config = HubConfig {
        db: if cli.in_memory {
            DbLocation::InMemory
        } else {
            DbLocation::File(cli.db)
        },
        log_level: cli
            .log_level
            .unwrap_or_else(|| default_log_level().to_string()),
        log_dir: cli.log_dir.map(absolute_dir),
        seed_on_first_run: !cli.no_seed,
    };

    if let Err(err) = config.init_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = match config.open_db() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &conn, config.seed_on_first_run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, conn: &Connection, seed: bool) -> CliResult {
    let repo = SqliteRecordRepository::try_new(conn)?;
    let mut service = HubService::start(repo, seed)?;

    match command {
        Command::Init => {
            println!("schema version={}", latest_version());
            println!("stores={}", service.snapshot().stores.len());
        }
        Command::Add { collection, record } => {
            let id = service.repo().add_value(&collection, parse_json(&record)?)?;
            println!("{id}");
        }
        Command::Put { collection, record } => {
            let id = service.repo().put_value(&collection, parse_json(&record)?)?;
            println!("{id}");
        }
        Command::Get { collection, id } => {
            let record = service.repo().get_value(&collection, id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::List {
            collection: Some(collection),
        } => {
            let records = service.repo().get_all_values(&collection)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::List { collection: None } => {
            println!("{}", serde_json::to_string_pretty(service.snapshot())?);
        }
        Command::Task {
            name,
            kind,
            date,
            time,
            assignee,
            id,
        } => {
            let mut draft = TaskDraft::new(name, kind, date.unwrap_or_else(today));
            draft.id = id;
            draft.time = time;
            draft.assignee = assignee;
            println!("{}", service.save_task(draft)?);
        }
        Command::Member { name, birthday } => {
            println!("{}", service.add_family_member(&name, birthday)?);
        }
        Command::Store { name } => {
            let store_id = service.open_or_create_store(&name)?;
            println!("{store_id}");
            show(service.snapshot(), View::ListDetail { store_id }, today());
        }
        Command::Item { store_id, name } => {
            println!("{}", service.add_shopping_item(store_id, &name)?);
        }
        Command::Toggle { id, undo } => {
            if !service.toggle_shopping_item(id, !undo)? {
                return Err(format!("shopping item not found: {id}").into());
            }
        }
        Command::Journal {
            title,
            content,
            task_id,
            id,
        } => {
            let draft = JournalDraft {
                id,
                title,
                content,
                task_id,
            };
            println!("{}", service.save_journal_entry(draft)?);
        }
        Command::Dashboard { date } => {
            show(service.snapshot(), View::Dashboard, date.unwrap_or_else(today));
        }
        Command::Show {
            view,
            store_id,
            date,
        } => {
            let view = View::parse(&view, store_id)?;
            show(service.snapshot(), view, date.unwrap_or_else(today));
        }
        Command::Version => {}
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

/// Switches to `view`, renders it and names the dialog its action button
/// would open.
fn show(snapshot: &Snapshot, view: View, day: NaiveDate) {
    let mut navigation = Navigation::new();
    navigation.switch_to(view);

    match navigation.current() {
        View::Dashboard => print_dashboard(snapshot, day),
        View::Shopping => {
            for summary in shopping_overview(snapshot) {
                let id = summary.store.id.unwrap_or_default();
                println!(
                    "{id} {}: {}/{} to buy",
                    summary.store.name, summary.needed, summary.total
                );
            }
        }
        View::ListDetail { store_id } => {
            let detail = list_detail(snapshot, store_id);
            if let Some(store) = detail.store {
                println!("{}", store.name);
            }
            for item in detail.items {
                let mark = if item.completed { "x" } else { " " };
                println!("[{mark}] {} {}", item.id.unwrap_or_default(), item.name);
            }
        }
        View::Calendar => {
            for event in calendar_events(snapshot) {
                println!(
                    "{} {} [{}]",
                    event.start.format("%Y-%m-%d %H:%M"),
                    event.title,
                    event.kind.icon_class()
                );
            }
        }
        View::Journal => {
            for entry in journal_timeline(snapshot) {
                println!("{} {}", entry.date, entry.title);
            }
        }
    }

    if let Some(modal) = navigation.trigger_action() {
        println!("action: {}", modal.id());
    }
}

fn print_dashboard(snapshot: &Snapshot, day: NaiveDate) {
    let view = dashboard(snapshot, day);

    println!("{day}");
    for task in &view.timed_tasks {
        let time = task
            .time
            .map(|time| time.format("%H:%M").to_string())
            .unwrap_or_default();
        println!("  {time} {} [{}]", task.name, task.kind.icon_class());
    }
    if view.is_daily_empty() {
        println!("  nothing else today");
        return;
    }
    for task in &view.daily_tasks {
        let who = task.assignee.as_deref().unwrap_or("anyone");
        println!("  - {} ({who})", task.name);
    }
    for summary in shopping_overview(snapshot) {
        if summary.needed > 0 {
            println!("  {}: {} to buy", summary.store.name, summary.needed);
        }
    }
}

fn absolute_dir(dir: PathBuf) -> PathBuf {
    // Why: the logger rejects relative directories, but a relative
    // `--log-dir` is what users naturally type.
    if dir.is_absolute() {
        return dir;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&dir))
        .unwrap_or(dir)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

fn parse_task_type(value: &str) -> Result<TaskType, String> {
    TaskType::parse(value).ok_or_else(|| {
        let known: Vec<&str> = TaskType::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown task type `{value}`, expected one of {}", known.join(", "))
    })
}

fn parse_clock_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|err| format!("expected HH:MM: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{parse_clock_time, parse_task_type, Cli, Command};
    use clap::{CommandFactory, Parser};
    use homehub_core::{TaskType, View};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn task_type_and_time_parsers() {
        assert_eq!(parse_task_type("doctor").unwrap(), TaskType::Doctor);
        assert!(parse_task_type("party").is_err());
        assert_eq!(
            parse_clock_time("09:30").unwrap().format("%H:%M").to_string(),
            "09:30"
        );
        assert!(parse_clock_time("9.30").is_err());
    }

    #[test]
    fn task_subcommand_parses_flags() {
        let cli = Cli::try_parse_from([
            "homehub",
            "--in-memory",
            "task",
            "Checkup",
            "--kind",
            "Doctor",
            "--date",
            "2024-05-01",
            "--time",
            "09:00",
        ])
        .unwrap();

        assert!(cli.in_memory);
        match cli.command {
            Command::Task {
                name, kind, time, ..
            } => {
                assert_eq!(name, "Checkup");
                assert_eq!(kind, TaskType::Doctor);
                assert!(time.is_some());
            }
            _ => panic!("expected task subcommand"),
        }
    }

    #[test]
    fn show_subcommand_resolves_route_names() {
        let cli = Cli::try_parse_from(["homehub", "show", "list-detail", "--store-id", "3"]).unwrap();
        match cli.command {
            Command::Show { view, store_id, .. } => {
                assert_eq!(
                    View::parse(&view, store_id),
                    Ok(View::ListDetail { store_id: 3 })
                );
            }
            _ => panic!("expected show subcommand"),
        }
    }
}
