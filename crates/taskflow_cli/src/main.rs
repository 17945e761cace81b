//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskflow_core` linkage with deterministic output.
//! - Print today's agenda from a storage file for quick local checks.
//!
//! Usage: `taskflow_cli [DB_PATH]`. Without `DB_PATH` only the probe lines
//! are printed; `TASKFLOW_*` variables configure logging.

use std::process::ExitCode;
use taskflow_core::{CoreConfig, SqliteStateGateway, TaskStore};

fn main() -> ExitCode {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_agenda(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskflow_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_agenda(db_path: &str) -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    config.init_logging()?;

    let gateway = SqliteStateGateway::open(db_path).map_err(|err| err.to_string())?;
    let store = TaskStore::open(gateway);
    let agenda = store.tasks_on_selected_date();

    println!(
        "agenda date={} tasks={} progress={}%",
        store.selected_date(),
        agenda.len(),
        store.selected_day_progress()
    );
    for task in agenda {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{mark}] {} {}-{} {} ({}, {})",
            task.id,
            task.start_time,
            task.end_time,
            task.title,
            task.category.label(),
            task.priority.label()
        );
    }
    Ok(())
}
