//! Console entry point for the student registrar.
//!
//! # Responsibility
//! - Resolve configuration, start file logging and open the store.
//! - Wire repositories and services into the menu controller.
//! - Close the store explicitly and map failures to the exit status.

mod config;
mod console;
mod controller;

use clap::Parser;
use config::Args;
use console::Console;
use controller::Controller;
use log::{error, info};
use registrar_core::{
    init_logging, BranchService, EventService, SqliteBranchRepository, SqliteEventRepository,
    SqliteStudentRepository, Store, StudentService,
};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let log_dir = args.resolved_log_dir();
    if let Err(err) = init_logging(args.resolved_log_level(), &log_dir) {
        eprintln!("warning: continuing without file logs: {err}");
    }

    let store = match open_store(&args) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: failed to open registration store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let session = run_session(&store);
    let closed = store.close();

    if let Err(err) = session {
        error!("event=session_end module=cli status=error");
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = closed {
        eprintln!("error: failed to close registration store: {err}");
        return ExitCode::FAILURE;
    }
    info!("event=session_end module=cli status=ok");
    ExitCode::SUCCESS
}

fn open_store(args: &Args) -> Result<Store, registrar_core::DbError> {
    if args.in_memory {
        Store::open_in_memory()
    } else {
        Store::open(&args.db_path)
    }
}

fn run_session(store: &Store) -> Result<(), String> {
    let conn = store.connection();
    let branches = SqliteBranchRepository::try_new(conn).map_err(|err| err.to_string())?;
    let events = SqliteEventRepository::try_new(conn).map_err(|err| err.to_string())?;
    let students = SqliteStudentRepository::try_new(conn).map_err(|err| err.to_string())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut controller = Controller::new(
        BranchService::new(branches),
        EventService::new(events),
        StudentService::new(students),
        Console::new(stdin.lock(), stdout.lock()),
    );
    controller
        .run()
        .map_err(|err| format!("terminal I/O failed: {err}"))
}
