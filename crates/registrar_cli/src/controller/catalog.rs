//! Branch and event catalog workflows (menu choices 1, 2, 8, 9, 11, 12).

use super::{select, Controller, ControllerResult, Selectable, Selection};
use log::info;
use registrar_core::{
    Branch, BranchRepository, Event, EventRepository, ServiceError, StudentRepository,
};
use std::io::{BufRead, Write};

impl<B, E, S, R, W> Controller<B, E, S, R, W>
where
    B: BranchRepository,
    E: EventRepository,
    S: StudentRepository,
    R: BufRead,
    W: Write,
{
    pub(super) fn add_branches(&mut self) -> ControllerResult<()> {
        loop {
            let input = self
                .console
                .prompt("\nEnter a branch (enter 'back' to go back to menu): ")?;
            let name = input.trim();
            if name.eq_ignore_ascii_case("back") {
                return Ok(());
            }
            if name.is_empty() {
                self.console
                    .say("No branch entered, please enter a valid branch.")?;
                continue;
            }

            match self.branches.add_branch(name) {
                Ok(_) => self.console.say("Branch added successfully.")?,
                Err(ServiceError::Duplicate { .. }) => self
                    .console
                    .say("Branch already present, please add a new branch.")?,
                Err(err) => return Err(err.into()),
            }
            if !self
                .console
                .confirm("Do you want to add more branches? (Y/N): ")?
            {
                return Ok(());
            }
        }
    }

    pub(super) fn add_events(&mut self) -> ControllerResult<()> {
        loop {
            let input = self
                .console
                .prompt("\nEnter an event (enter 'back' to go back to menu): ")?;
            let name = input.trim();
            if name.eq_ignore_ascii_case("back") {
                return Ok(());
            }
            if name.is_empty() {
                self.console
                    .say("No event entered, please enter a valid event.")?;
                continue;
            }

            match self.events.add_event(name) {
                Ok(_) => self.console.say("Event added successfully.")?,
                Err(ServiceError::Duplicate { .. }) => self
                    .console
                    .say("Event already present, please add a new event.")?,
                Err(err) => return Err(err.into()),
            }
            if !self
                .console
                .confirm("Do you want to add more events? (Y/N): ")?
            {
                return Ok(());
            }
        }
    }

    pub(super) fn update_branch(&mut self) -> ControllerResult<()> {
        let branches = self.branches.get_all_branches()?;
        self.list_records("Branches", &branches)?;
        let Some(branch) = self.pick_record(
            &branches,
            "Enter branch ID or branch name to update: ",
            "branch",
        )?
        else {
            return Ok(());
        };

        self.console
            .say(format!("Current Branch Details: {branch}"))?;
        let new_name = self.console.prompt("Enter new branch name: ")?;
        if new_name.trim().is_empty() {
            self.console.say("No new name entered. Update aborted.")?;
            return Ok(());
        }
        self.branches
            .update_branch(&Branch::new(branch.id, new_name))?;
        self.console.say("Branch updated successfully.")?;
        Ok(())
    }

    pub(super) fn delete_branch(&mut self) -> ControllerResult<()> {
        let branches = self.branches.get_all_branches()?;
        self.list_records("Branches", &branches)?;
        let Some(branch) = self.pick_record(
            &branches,
            "Enter branch ID or branch name to delete: ",
            "branch",
        )?
        else {
            return Ok(());
        };

        let detached = self.branches.delete_branch(branch.id)?;
        info!(
            "event=branch_delete module=cli status=ok branch_id={} detached_students={}",
            branch.id, detached
        );
        self.console.say("Branch deleted successfully.")?;
        if detached > 0 {
            self.console.say(format!(
                "{detached} student(s) are no longer assigned to a branch."
            ))?;
        }
        Ok(())
    }

    pub(super) fn update_event(&mut self) -> ControllerResult<()> {
        let events = self.events.get_all_events()?;
        self.list_records("Events", &events)?;
        let Some(event) = self.pick_record(
            &events,
            "Enter event ID or event name to update: ",
            "event",
        )?
        else {
            return Ok(());
        };

        self.console.say(format!("Current Event Details: {event}"))?;
        let new_name = self.console.prompt("Enter new event name: ")?;
        if new_name.trim().is_empty() {
            self.console.say("No new name entered. Update aborted.")?;
            return Ok(());
        }
        self.events.update_event(&Event::new(event.id, new_name))?;
        self.console.say("Event updated successfully.")?;
        Ok(())
    }

    pub(super) fn delete_event(&mut self) -> ControllerResult<()> {
        let events = self.events.get_all_events()?;
        self.list_records("Events", &events)?;
        let Some(event) = self.pick_record(
            &events,
            "Enter event ID or event name to delete: ",
            "event",
        )?
        else {
            return Ok(());
        };

        let detached = self.events.delete_event(event.id)?;
        info!(
            "event=event_delete module=cli status=ok event_id={} detached_students={}",
            event.id, detached
        );
        self.console.say("Event deleted successfully.")?;
        if detached > 0 {
            self.console
                .say(format!("{detached} student(s) were removed from this event."))?;
        }
        Ok(())
    }

    /// Reads one selector and resolves it; `None` means the workflow aborts.
    fn pick_record<T: Selectable + Clone>(
        &mut self,
        records: &[T],
        question: &str,
        noun: &str,
    ) -> ControllerResult<Option<T>> {
        let input = self.console.prompt(question)?;
        if input.trim().is_empty() {
            self.console
                .say(format!("{} selection is mandatory.", capitalize(noun)))?;
            return Ok(None);
        }
        match select(records, &input) {
            Selection::Found(record) => Ok(Some(record.clone())),
            Selection::UnknownId(_) | Selection::UnknownName => {
                self.console
                    .say(format!("No {noun} found for the given input."))?;
                Ok(None)
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
