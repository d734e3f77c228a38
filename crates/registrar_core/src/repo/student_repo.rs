//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist students together with their owning-side associations
//!   (`students.branch_id`, `student_events`).
//! - Resolve associations into `StudentRecord` read models via joins.
//! - Answer inverse queries (students of a branch, attendees of an event).
//!
//! # Invariants
//! - Writes call `Student::validate()` before SQL mutations.
//! - `update_student` replaces the full record, event set included.
//! - Listing order is `id ASC`; event lists are ordered by event id.

use crate::db::unit_of_work::run_in_transaction;
use crate::model::branch::{Branch, BranchId};
use crate::model::event::{Event, EventId};
use crate::model::student::{Student, StudentId, StudentRecord};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const ENTITY: &str = "Student";

const STUDENT_SELECT_SQL: &str = "SELECT
    s.id AS id,
    s.first_name AS first_name,
    s.last_name AS last_name,
    s.phone AS phone,
    s.email AS email,
    s.address AS address,
    s.dob AS dob,
    s.age AS age,
    s.branch_id AS branch_id
FROM students s";

/// Repository interface for student persistence.
pub trait StudentRepository {
    /// Inserts one student with its branch and events; returns the new id.
    fn save_student(&self, student: &Student) -> RepoResult<StudentId>;
    fn student_exists(&self, id: StudentId) -> RepoResult<bool>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn get_student_record(&self, id: StudentId) -> RepoResult<Option<StudentRecord>>;
    fn list_student_records(&self) -> RepoResult<Vec<StudentRecord>>;
    /// Full-record replace by id.
    fn update_student(&self, student: &Student) -> RepoResult<()>;
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
    fn list_students_in_branch(&self, branch_id: BranchId) -> RepoResult<Vec<Student>>;
    fn list_students_for_event(&self, event_id: EventId) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_students(
        &self,
        where_clause: &str,
        param: Option<i64>,
    ) -> RepoResult<Vec<Student>> {
        let sql = format!("{STUDENT_SELECT_SQL} {where_clause} ORDER BY s.id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match param {
            Some(value) => stmt.query([value])?,
            None => stmt.query([])?,
        };

        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(self.conn, row)?);
        }
        Ok(students)
    }

    fn resolve_record(&self, student: Student) -> RepoResult<StudentRecord> {
        let branch = match student.branch_id {
            Some(branch_id) => self
                .conn
                .query_row(
                    "SELECT id, name FROM branches WHERE id = ?1;",
                    [branch_id],
                    |row| Ok(Branch::new(row.get(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?,
            None => None,
        };
        let events = load_events_for_student(self.conn, student.id)?;
        Ok(StudentRecord {
            student,
            branch,
            events,
        })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn save_student(&self, student: &Student) -> RepoResult<StudentId> {
        student.validate()?;

        let id = run_in_transaction(self.conn, "save_student", |tx| -> RepoResult<StudentId> {
            tx.execute(
                "INSERT INTO students (
                    first_name,
                    last_name,
                    phone,
                    email,
                    address,
                    dob,
                    age,
                    branch_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.phone.as_str(),
                    student.email.as_str(),
                    student.address.as_str(),
                    student.dob,
                    student.age,
                    student.branch_id,
                ],
            )?;
            let id = tx.last_insert_rowid();
            insert_event_links(tx, id, &student.event_ids)?;
            Ok(id)
        })?;

        info!(
            "event=student_saved module=repo status=ok student_id={} event_count={}",
            id,
            student.event_ids.len()
        );
        Ok(id)
    }

    fn student_exists(&self, id: StudentId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        Ok(self
            .query_students("WHERE s.id = ?1", Some(id))?
            .into_iter()
            .next())
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.query_students("", None)
    }

    fn get_student_record(&self, id: StudentId) -> RepoResult<Option<StudentRecord>> {
        match self.get_student(id)? {
            Some(student) => Ok(Some(self.resolve_record(student)?)),
            None => Ok(None),
        }
    }

    fn list_student_records(&self) -> RepoResult<Vec<StudentRecord>> {
        self.list_students()?
            .into_iter()
            .map(|student| self.resolve_record(student))
            .collect()
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;

        run_in_transaction(self.conn, "update_student", |tx| -> RepoResult<()> {
            let changed = tx.execute(
                "UPDATE students
                 SET
                    first_name = ?1,
                    last_name = ?2,
                    phone = ?3,
                    email = ?4,
                    address = ?5,
                    dob = ?6,
                    age = ?7,
                    branch_id = ?8
                 WHERE id = ?9;",
                params![
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.phone.as_str(),
                    student.email.as_str(),
                    student.address.as_str(),
                    student.dob,
                    student.age,
                    student.branch_id,
                    student.id,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: ENTITY,
                    id: student.id,
                });
            }

            tx.execute(
                "DELETE FROM student_events WHERE student_id = ?1;",
                [student.id],
            )?;
            insert_event_links(tx, student.id, &student.event_ids)?;
            Ok(())
        })?;

        info!(
            "event=student_updated module=repo status=ok student_id={}",
            student.id
        );
        Ok(())
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        run_in_transaction(self.conn, "delete_student", |tx| -> RepoResult<()> {
            let changed = tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound { entity: ENTITY, id });
            }
            Ok(())
        })?;

        info!("event=student_deleted module=repo status=ok student_id={id}");
        Ok(())
    }

    fn list_students_in_branch(&self, branch_id: BranchId) -> RepoResult<Vec<Student>> {
        self.query_students("WHERE s.branch_id = ?1", Some(branch_id))
    }

    fn list_students_for_event(&self, event_id: EventId) -> RepoResult<Vec<Student>> {
        self.query_students(
            "INNER JOIN student_events se ON se.student_id = s.id
             WHERE se.event_id = ?1",
            Some(event_id),
        )
    }
}

fn insert_event_links(
    conn: &Connection,
    student_id: StudentId,
    event_ids: &BTreeSet<EventId>,
) -> RepoResult<()> {
    let mut stmt =
        conn.prepare("INSERT INTO student_events (student_id, event_id) VALUES (?1, ?2);")?;
    for event_id in event_ids {
        stmt.execute(params![student_id, event_id])?;
    }
    Ok(())
}

fn load_event_ids(conn: &Connection, student_id: StudentId) -> RepoResult<BTreeSet<EventId>> {
    let mut stmt = conn.prepare(
        "SELECT event_id
         FROM student_events
         WHERE student_id = ?1
         ORDER BY event_id ASC;",
    )?;
    let rows = stmt.query_map([student_id], |row| row.get::<_, EventId>(0))?;
    rows.collect::<Result<BTreeSet<_>, _>>().map_err(Into::into)
}

fn load_events_for_student(conn: &Connection, student_id: StudentId) -> RepoResult<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.name
         FROM student_events se
         INNER JOIN events e ON e.id = se.event_id
         WHERE se.student_id = ?1
         ORDER BY e.id ASC;",
    )?;
    let rows = stmt.query_map([student_id], |row| {
        Ok(Event::new(row.get(0)?, row.get::<_, String>(1)?))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn parse_student_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    let age: i64 = row.get("age")?;
    let age = u32::try_from(age).map_err(|_| {
        RepoError::InvalidData(format!("invalid age `{age}` in students.age for id {id}"))
    })?;

    Ok(Student {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        address: row.get("address")?,
        dob: row.get("dob")?,
        age,
        branch_id: row.get("branch_id")?,
        event_ids: load_event_ids(conn, id)?,
    })
}
