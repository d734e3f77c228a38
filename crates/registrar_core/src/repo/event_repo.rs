//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `events`.
//! - Apply the delete policy: a deleted event disappears from every student's
//!   event set.
//!
//! # Invariants
//! - Listing order is `id ASC` (insertion order).
//! - Name lookups ignore case using `name_matches` (Unicode lowercase).

use crate::db::unit_of_work::run_in_transaction;
use crate::model::event::{Event, EventId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "Event";

/// Repository interface for event persistence.
pub trait EventRepository {
    /// Inserts one event and returns it with its generated id.
    fn save_event(&self, name: &str) -> RepoResult<Event>;
    fn get_event_by_id(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Case-insensitive exact name lookup; first match in id order.
    fn get_event_by_name(&self, name: &str) -> RepoResult<Option<Event>>;
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    /// Deletes one event and returns how many students were attending it.
    fn delete_event(&self, id: EventId) -> RepoResult<usize>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn save_event(&self, name: &str) -> RepoResult<Event> {
        let event = run_in_transaction(self.conn, "save_event", |tx| -> RepoResult<Event> {
            tx.execute("INSERT INTO events (name) VALUES (?1);", [name])?;
            Ok(Event::new(tx.last_insert_rowid(), name))
        })?;
        info!(
            "event=event_saved module=repo status=ok event_id={}",
            event.id
        );
        Ok(event)
    }

    fn get_event_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.conn
            .query_row(
                "SELECT id, name FROM events WHERE id = ?1;",
                [id],
                parse_event_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_event_by_name(&self, name: &str) -> RepoResult<Option<Event>> {
        // SQLite NOCASE folds ASCII only; match with the model's Unicode rule.
        Ok(self
            .list_events()?
            .into_iter()
            .find(|event| event.name_matches(name)))
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM events ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_event_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        run_in_transaction(self.conn, "update_event", |tx| -> RepoResult<()> {
            let changed = tx.execute(
                "UPDATE events SET name = ?1 WHERE id = ?2;",
                params![event.name.as_str(), event.id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: ENTITY,
                    id: event.id,
                });
            }
            Ok(())
        })
    }

    fn delete_event(&self, id: EventId) -> RepoResult<usize> {
        let detached = run_in_transaction(self.conn, "delete_event", |tx| -> RepoResult<usize> {
            let detached: i64 = tx.query_row(
                "SELECT COUNT(*) FROM student_events WHERE event_id = ?1;",
                [id],
                |row| row.get(0),
            )?;
            let changed = tx.execute("DELETE FROM events WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound { entity: ENTITY, id });
            }
            usize::try_from(detached)
                .map_err(|_| RepoError::InvalidData(format!("negative student count {detached}")))
        })?;
        info!(
            "event=event_deleted module=repo status=ok event_id={} detached_students={}",
            id, detached
        );
        Ok(detached)
    }
}

fn parse_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
