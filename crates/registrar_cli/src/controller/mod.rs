//! Menu-driven registration controller.
//!
//! # Responsibility
//! - Run the numbered menu loop and dispatch to one workflow per choice.
//! - Catch service failures at each workflow boundary, report them with a
//!   workflow-specific prefix and resume the menu.
//!
//! # Invariants
//! - Input validation failures re-prompt; they never surface as errors.
//! - Only I/O failures end the loop early; end of input ends it normally.
//! - Log lines carry ids, counts and error kinds, never typed-in values.

mod catalog;
mod student_flow;

use crate::console::Console;
use log::{error, info};
use registrar_core::validation::parse_id;
use registrar_core::{
    Branch, BranchRepository, BranchService, Event, EventRepository, EventService, ServiceError,
    StudentRepository, StudentService,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const MENU_ITEMS: [&str; 13] = [
    "1. Add branches",
    "2. Add events",
    "3. Register Student",
    "4. View Student Records",
    "5. Update Student Records",
    "6. Delete Student Records",
    "7. View Branch of Student",
    "8. Update Branch",
    "9. Delete Branch",
    "10. View Events of Student",
    "11. Update Events",
    "12. Delete Events",
    "13. Exit Registration",
];

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Failure inside one workflow.
#[derive(Debug)]
pub enum ControllerError {
    /// Terminal read/write failure, including end of input.
    Io(io::Error),
    /// Domain or persistence failure reported by a service.
    Service(ServiceError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<io::Error> for ControllerError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ServiceError> for ControllerError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddBranches,
    AddEvents,
    RegisterStudent,
    ViewStudents,
    UpdateStudent,
    DeleteStudent,
    StudentBranch,
    UpdateBranch,
    DeleteBranch,
    StudentEvents,
    UpdateEvent,
    DeleteEvent,
    Exit,
}

impl MenuChoice {
    fn from_number(value: i64) -> Option<Self> {
        let choice = match value {
            1 => Self::AddBranches,
            2 => Self::AddEvents,
            3 => Self::RegisterStudent,
            4 => Self::ViewStudents,
            5 => Self::UpdateStudent,
            6 => Self::DeleteStudent,
            7 => Self::StudentBranch,
            8 => Self::UpdateBranch,
            9 => Self::DeleteBranch,
            10 => Self::StudentEvents,
            11 => Self::UpdateEvent,
            12 => Self::DeleteEvent,
            13 => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }

    fn log_name(self) -> &'static str {
        match self {
            Self::AddBranches => "branch_add",
            Self::AddEvents => "event_add",
            Self::RegisterStudent => "student_register",
            Self::ViewStudents => "student_list",
            Self::UpdateStudent => "student_update",
            Self::DeleteStudent => "student_delete",
            Self::StudentBranch => "student_branch",
            Self::UpdateBranch => "branch_update",
            Self::DeleteBranch => "branch_delete",
            Self::StudentEvents => "student_events",
            Self::UpdateEvent => "event_update",
            Self::DeleteEvent => "event_delete",
            Self::Exit => "exit",
        }
    }

    fn error_prefix(self) -> &'static str {
        match self {
            Self::AddBranches => "Error adding branch",
            Self::AddEvents => "Error adding event",
            Self::RegisterStudent => "Error registering student",
            Self::ViewStudents => "Error viewing student records",
            Self::UpdateStudent => "Error updating student",
            Self::DeleteStudent => "Error deleting student",
            Self::StudentBranch => "Error viewing student branch",
            Self::UpdateBranch => "Error updating branch",
            Self::DeleteBranch => "Error deleting branch",
            Self::StudentEvents => "Error viewing student events",
            Self::UpdateEvent => "Error updating event",
            Self::DeleteEvent => "Error deleting event",
            Self::Exit => "Error exiting",
        }
    }
}

/// Records that can be picked by numeric id or by case-insensitive name.
trait Selectable {
    fn record_id(&self) -> i64;
    fn record_name(&self) -> &str;
    fn matches_name(&self, name: &str) -> bool;
}

impl Selectable for Branch {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn record_name(&self) -> &str {
        &self.name
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name_matches(name)
    }
}

impl Selectable for Event {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn record_name(&self) -> &str {
        &self.name
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name_matches(name)
    }
}

/// Outcome of resolving one selector token.
enum Selection<'a, T> {
    Found(&'a T),
    UnknownId(i64),
    UnknownName,
}

/// Integer selectors are ids only; anything else is an exact name match.
fn select<'a, T: Selectable>(records: &'a [T], selector: &str) -> Selection<'a, T> {
    let selector = selector.trim();
    match parse_id(selector) {
        Some(id) => records
            .iter()
            .find(|record| record.record_id() == id)
            .map_or(Selection::UnknownId(id), Selection::Found),
        None => records
            .iter()
            .find(|record| record.matches_name(selector))
            .map_or(Selection::UnknownName, Selection::Found),
    }
}

fn is_end_of_input(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::UnexpectedEof
}

fn error_kind(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::InvalidInput(_) => "invalid_input",
        ServiceError::Duplicate { .. } => "duplicate",
        ServiceError::NotFound { .. } => "not_found",
        ServiceError::Operation { .. } => "operation",
    }
}

/// Console front-end over the three registration services.
pub struct Controller<B, E, S, R, W>
where
    B: BranchRepository,
    E: EventRepository,
    S: StudentRepository,
{
    branches: BranchService<B>,
    events: EventService<E>,
    students: StudentService<S>,
    console: Console<R, W>,
}

impl<B, E, S, R, W> Controller<B, E, S, R, W>
where
    B: BranchRepository,
    E: EventRepository,
    S: StudentRepository,
    R: BufRead,
    W: Write,
{
    pub fn new(
        branches: BranchService<B>,
        events: EventService<E>,
        students: StudentService<S>,
        console: Console<R, W>,
    ) -> Self {
        Self {
            branches,
            events,
            students,
            console,
        }
    }

    /// Runs the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        info!("event=menu_start module=cli status=ok");
        loop {
            self.show_menu()?;
            let number = match self.console.read_integer("Enter your choice: ") {
                Ok(number) => number,
                Err(err) if is_end_of_input(&err) => return self.farewell("eof"),
                Err(err) => return Err(err),
            };
            let Some(choice) = MenuChoice::from_number(number) else {
                self.console.say("Invalid choice, please try again.")?;
                continue;
            };
            if choice == MenuChoice::Exit {
                return self.farewell("menu");
            }

            match self.dispatch(choice) {
                Ok(()) => {}
                Err(ControllerError::Service(err)) => {
                    error!(
                        "event=workflow_failed module=cli status=error workflow={} kind={}",
                        choice.log_name(),
                        error_kind(&err)
                    );
                    self.console
                        .say(format!("{}: {}", choice.error_prefix(), err))?;
                }
                Err(ControllerError::Io(err)) if is_end_of_input(&err) => {
                    return self.farewell("eof");
                }
                Err(ControllerError::Io(err)) => return Err(err),
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> ControllerResult<()> {
        match choice {
            MenuChoice::AddBranches => self.add_branches(),
            MenuChoice::AddEvents => self.add_events(),
            MenuChoice::RegisterStudent => self.register_student(),
            MenuChoice::ViewStudents => self.view_student_records(),
            MenuChoice::UpdateStudent => self.update_student(),
            MenuChoice::DeleteStudent => self.delete_student(),
            MenuChoice::StudentBranch => self.view_student_branch(),
            MenuChoice::UpdateBranch => self.update_branch(),
            MenuChoice::DeleteBranch => self.delete_branch(),
            MenuChoice::StudentEvents => self.view_student_events(),
            MenuChoice::UpdateEvent => self.update_event(),
            MenuChoice::DeleteEvent => self.delete_event(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.console.say("\n----- Student Registration Menu -----")?;
        for item in MENU_ITEMS {
            self.console.say(item)?;
        }
        Ok(())
    }

    fn farewell(&mut self, reason: &str) -> io::Result<()> {
        info!("event=menu_exit module=cli status=ok reason={reason}");
        self.console.say("Exiting registration. Thank you.")
    }

    fn list_records<T: Selectable>(&mut self, heading: &str, records: &[T]) -> io::Result<()> {
        self.console.say(format!("\n---- Available {heading} ----"))?;
        for record in records {
            self.console.say(format!(
                "ID: {}, Name: {}",
                record.record_id(),
                record.record_name()
            ))?;
        }
        Ok(())
    }
}
