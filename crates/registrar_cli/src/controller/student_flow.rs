//! Student workflows (menu choices 3 to 7 and 10).
//!
//! Branch and event references are resolved against freshly listed records
//! before anything is persisted, so the services only ever see existing ids.

use super::{select, Controller, ControllerResult, Selection};
use log::info;
use registrar_core::validation::{format_date, is_valid_phone, parse_age, parse_date};
use registrar_core::{
    Branch, BranchRepository, Event, EventRepository, Student, StudentId, StudentPatch,
    StudentRepository,
};
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

impl<B, E, S, R, W> Controller<B, E, S, R, W>
where
    B: BranchRepository,
    E: EventRepository,
    S: StudentRepository,
    R: BufRead,
    W: Write,
{
    pub(super) fn register_student(&mut self) -> ControllerResult<()> {
        if !self.branches.branch_exists()? || !self.events.events_exist()? {
            self.console.say(
                "Please ensure that branches and events are added before registering students.",
            )?;
            return Ok(());
        }

        self.console.say("\nEnter student details:")?;
        let first_name = self.console.read_string("Enter first name: ")?;
        let last_name = self.console.read_string("Enter last name: ")?;
        let dob = self
            .console
            .read_date("Enter date of birth (yyyy-MM-dd): ")?;
        let age = self.console.read_age("Enter age: ")?;
        let email = self.console.read_email("Enter email ID: ")?;
        let phone = self.console.read_phone("Enter phone number: ")?;
        let address = self.console.read_string("Enter address: ")?;

        let branches = self.branches.get_all_branches()?;
        self.list_records("Branches", &branches)?;
        let branch = self.choose_branch(&branches)?;

        let events = self.events.get_all_events()?;
        self.list_records("Events", &events)?;
        let event_ids = self.choose_events(&events)?;

        let mut student = Student::new(first_name, last_name, phone, email, address, dob, age);
        student.branch_id = Some(branch.id);
        student.event_ids = event_ids;

        let id = self.students.register_student(&student)?;
        self.console
            .say(format!("Student registered successfully with ID: {id}"))?;
        Ok(())
    }

    pub(super) fn view_student_records(&mut self) -> ControllerResult<()> {
        let records = self.students.get_all_student_records()?;
        if records.is_empty() {
            self.console
                .say("Student records are empty. Please complete registration of students.")?;
            return Ok(());
        }

        self.console.say("\n---- Student Records ----")?;
        for record in &records {
            self.console.say(record.student.to_string())?;
            match &record.branch {
                Some(branch) => self
                    .console
                    .say(format!("  Branch: {} (ID: {})", branch.name, branch.id))?,
                None => self.console.say("  Branch: Not assigned")?,
            }
            if record.events.is_empty() {
                self.console.say("  Events: None assigned")?;
            } else {
                self.console.say("  Events:")?;
                for event in &record.events {
                    self.console
                        .say(format!("     - {} (ID: {})", event.name, event.id))?;
                }
            }
            self.console
                .say("---------------------------------------------------")?;
        }
        Ok(())
    }

    pub(super) fn update_student(&mut self) -> ControllerResult<()> {
        let id = self.console.read_integer("Enter student ID to update: ")?;
        if !self.students.student_exists(id)? {
            self.console.say(format!("No student found with ID: {id}"))?;
            return Ok(());
        }
        let current = self.students.get_student_by_id(id)?;
        self.console.say(format!("Current details: {current}"))?;

        let mut patch = StudentPatch {
            first_name: self.keep_or_replace("first name", &current.first_name)?,
            last_name: self.keep_or_replace("last name", &current.last_name)?,
            address: self.keep_or_replace("address", &current.address)?,
            ..StudentPatch::default()
        };

        if let Some(phone) = self.keep_or_replace("phone number", &current.phone)? {
            if is_valid_phone(&phone) {
                patch.phone = Some(phone);
            } else {
                self.console.say("Keeping old phone number.")?;
            }
        }
        if let Some(dob) =
            self.keep_or_replace("date of birth (yyyy-MM-dd)", &format_date(current.dob))?
        {
            match parse_date(&dob) {
                Some(date) => patch.dob = Some(date),
                None => self.console.say("Keeping old date of birth.")?,
            }
        }
        if let Some(age) = self.keep_or_replace("age", &current.age.to_string())? {
            match parse_age(&age) {
                Some(age) => patch.age = Some(age),
                None => self.console.say("Keeping previous age.")?,
            }
        }

        self.students.apply_patch(id, &patch)?;
        self.console.say("Student updated successfully.")?;
        Ok(())
    }

    pub(super) fn delete_student(&mut self) -> ControllerResult<()> {
        let id = self.console.read_integer("Enter student ID to delete: ")?;
        if !self.students.student_exists(id)? {
            self.console.say(format!("No student found with ID: {id}"))?;
            return Ok(());
        }
        self.students.delete_student(id)?;
        self.console.say("Student deleted successfully.")?;
        Ok(())
    }

    pub(super) fn view_student_branch(&mut self) -> ControllerResult<()> {
        if !self.branches.branch_exists()? {
            self.console
                .say("Branch records are empty. Please complete adding branches.")?;
            return Ok(());
        }
        let Some(id) = self.read_registered_student_id("Enter student ID to view branch: ")?
        else {
            return Ok(());
        };

        let record = self.students.get_student_record(id)?;
        if let Some(branch) = record.branch {
            self.console.say(format!(
                "Student ID {id} is assigned to branch: {} (ID: {})",
                branch.name, branch.id
            ))?;
            return Ok(());
        }

        self.console
            .say(format!("No branch assigned for student with ID: {id}"))?;
        if !self
            .console
            .confirm("Would you like to assign a branch now? (Y/N): ")?
        {
            return Ok(());
        }

        let branches = self.branches.get_all_branches()?;
        self.list_records("Branches", &branches)?;
        let input = self
            .console
            .prompt("Select a branch (enter branch id or branch name): ")?;
        let Selection::Found(branch) = select(&branches, &input) else {
            self.console.say("No valid branch selected.")?;
            return Ok(());
        };

        let patch = StudentPatch {
            branch_id: Some(Some(branch.id)),
            ..StudentPatch::default()
        };
        self.students.apply_patch(id, &patch)?;
        info!(
            "event=student_branch_assign module=cli status=ok student_id={} branch_id={}",
            id, branch.id
        );
        self.console.say("Branch assigned successfully.")?;
        Ok(())
    }

    pub(super) fn view_student_events(&mut self) -> ControllerResult<()> {
        let Some(id) = self.read_registered_student_id("Enter student ID to view events: ")?
        else {
            return Ok(());
        };

        let record = self.students.get_student_record(id)?;
        if record.events.is_empty() {
            self.console
                .say(format!("No events registered for student with ID: {id}"))?;
        } else {
            self.console
                .say(format!("Events registered for student ID {id}:"))?;
            for event in &record.events {
                self.console
                    .say(format!(" - {} (ID: {})", event.name, event.id))?;
            }
        }

        if !self
            .console
            .confirm("Would you like to add more events? (Y/N): ")?
        {
            self.console
                .say("No additional events added. Returning to main menu.")?;
            return Ok(());
        }

        let available = self.events.get_all_events()?;
        self.list_records("Events", &available)?;
        let input = self.console.prompt(
            "Enter event ID or event name to add (for multiple, use comma separated values): ",
        )?;
        if input.trim().eq_ignore_ascii_case("none") {
            self.console.say("No new events selected.")?;
            return Ok(());
        }

        let mut event_ids = record.student.event_ids.clone();
        let mut added = 0usize;
        for token in input.split(',') {
            let token = token.trim();
            let Selection::Found(event) = select(&available, token) else {
                self.console
                    .say(format!("No event found for input: {token}"))?;
                continue;
            };
            if event_ids.insert(event.id) {
                added += 1;
                self.console.say(format!(
                    "Event {} (ID: {}) assigned successfully.",
                    event.name, event.id
                ))?;
            } else {
                self.console.say(format!(
                    "Event {} (ID: {}) is already assigned.",
                    event.name, event.id
                ))?;
            }
        }

        if added > 0 {
            let patch = StudentPatch {
                event_ids: Some(event_ids),
                ..StudentPatch::default()
            };
            self.students.apply_patch(id, &patch)?;
            info!(
                "event=student_events_add module=cli status=ok student_id={} added={}",
                id, added
            );
        }
        Ok(())
    }

    /// Loops until a listed branch is chosen by id or name.
    fn choose_branch(&mut self, branches: &[Branch]) -> ControllerResult<Branch> {
        loop {
            let input = self
                .console
                .prompt("Please select a branch (enter branch id or branch name): ")?;
            let input = input.trim();
            if input.is_empty() {
                self.console
                    .say("Branch selection is mandatory. Please select a branch.")?;
                continue;
            }
            match select(branches, input) {
                Selection::Found(branch) => return Ok(branch.clone()),
                Selection::UnknownId(id) => {
                    self.console.say(format!("No branch found with ID: {id}"))?
                }
                Selection::UnknownName => self
                    .console
                    .say(format!("Branch '{input}' does not exist."))?,
            }
        }
    }

    /// Reads a non-blank event answer and resolves each comma-separated token.
    ///
    /// `none` selects nothing; unknown tokens are reported and skipped.
    fn choose_events(&mut self, events: &[Event]) -> ControllerResult<BTreeSet<i64>> {
        let input = loop {
            let input = self.console.prompt(
                "Please select event(s) (enter 'none' if not choosing any; for multiple, use comma separated values; enter event id(s) or event name(s)): ",
            )?;
            if !input.trim().is_empty() {
                break input;
            }
            self.console.say(
                "Event selection cannot be blank. Please enter valid event(s) or 'none'.",
            )?;
        };

        let mut selected = BTreeSet::new();
        if input.trim().eq_ignore_ascii_case("none") {
            self.console.say("No events selected.")?;
            return Ok(selected);
        }
        for token in input.split(',') {
            let token = token.trim();
            match select(events, token) {
                Selection::Found(event) => {
                    selected.insert(event.id);
                    self.console
                        .say(format!("Event with ID {} selected.", event.id))?;
                }
                Selection::UnknownId(id) => {
                    self.console.say(format!("No event found with ID: {id}"))?
                }
                Selection::UnknownName => self
                    .console
                    .say(format!("Event '{token}' does not exist."))?,
            }
        }
        Ok(selected)
    }

    /// Prompts for a replacement value; blank input keeps `current`.
    fn keep_or_replace(
        &mut self,
        field: &str,
        current: &str,
    ) -> ControllerResult<Option<String>> {
        let input = self.console.prompt(&format!(
            "Enter new {field} (or press Enter to keep [{current}]): "
        ))?;
        let input = input.trim();
        Ok((!input.is_empty()).then(|| input.to_string()))
    }

    /// Reads a student id and checks it is registered.
    fn read_registered_student_id(
        &mut self,
        question: &str,
    ) -> ControllerResult<Option<StudentId>> {
        let id = self.console.read_integer(question)?;
        if self.students.student_exists(id)? {
            return Ok(Some(id));
        }
        self.console.say(format!(
            "No student registered with ID: {id}. Please register the student first."
        ))?;
        Ok(None)
    }
}

