//! Event use-case service.
//!
//! # Responsibility
//! - Provide add/list/lookup/rename/delete entry points for events.
//! - Enforce case-insensitive name uniqueness before any write.
//!
//! # Invariants
//! - Names are trimmed before persistence and never blank.
//! - Uniqueness is checked here; storage does not enforce it.

use crate::model::event::{Event, EventId};
use crate::repo::event_repo::EventRepository;
use crate::service::{normalize_name, ServiceError, ServiceResult};
use log::{info, warn};

const ENTITY: &str = "Event";

/// Use-case service wrapper for event operations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new event and returns it with its generated id.
    ///
    /// # Errors
    /// - `InvalidInput` for blank names.
    /// - `Duplicate` when the name is already taken (case-insensitive).
    pub fn add_event(&self, name: &str) -> ServiceResult<Event> {
        let name = normalize_name(ENTITY, name)?;
        if self.event_exists_by_name(&name)? {
            warn!("event=event_add module=service status=rejected reason=duplicate");
            return Err(ServiceError::Duplicate { entity: ENTITY, name });
        }

        let event = self
            .repo
            .save_event(&name)
            .map_err(|err| ServiceError::from_repo("Error adding event to database", err))?;
        info!(
            "event=event_add module=service status=ok event_id={}",
            event.id
        );
        Ok(event)
    }

    /// Returns true when at least one event is persisted.
    pub fn events_exist(&self) -> ServiceResult<bool> {
        Ok(!self.get_all_events()?.is_empty())
    }

    pub fn event_exists_by_name(&self, name: &str) -> ServiceResult<bool> {
        Ok(self.get_event_by_name(name)?.is_some())
    }

    /// Lists all events in insertion order.
    pub fn get_all_events(&self) -> ServiceResult<Vec<Event>> {
        self.repo
            .list_events()
            .map_err(|err| ServiceError::from_repo("No event records retrieved", err))
    }

    pub fn get_event_by_id(&self, id: EventId) -> ServiceResult<Option<Event>> {
        self.repo.get_event_by_id(id).map_err(|err| {
            ServiceError::from_repo(format!("Error retrieving event with ID {id}"), err)
        })
    }

    pub fn get_event_by_name(&self, name: &str) -> ServiceResult<Option<Event>> {
        self.repo.get_event_by_name(name).map_err(|err| {
            ServiceError::from_repo(format!("Error retrieving event with name {name}"), err)
        })
    }

    /// Persists a renamed event identified by `event.id`.
    ///
    /// # Errors
    /// - `InvalidInput` for blank names.
    /// - `Duplicate` when another event already uses the new name.
    /// - `NotFound` when no event has this id.
    pub fn update_event(&self, event: &Event) -> ServiceResult<()> {
        let name = normalize_name(ENTITY, &event.name)?;
        if let Some(existing) = self.get_event_by_name(&name)? {
            if existing.id != event.id {
                return Err(ServiceError::Duplicate { entity: ENTITY, name });
            }
        }

        let renamed = Event::new(event.id, name);
        self.repo
            .update_event(&renamed)
            .map_err(|err| ServiceError::from_repo("Error updating event records", err))?;
        info!(
            "event=event_update module=service status=ok event_id={}",
            event.id
        );
        Ok(())
    }

    /// Deletes an event and drops it from every student's event set.
    ///
    /// Returns the number of students that were attending it.
    pub fn delete_event(&self, id: EventId) -> ServiceResult<usize> {
        self.repo
            .delete_event(id)
            .map_err(|err| ServiceError::from_repo("Error deleting event records", err))
    }
}
