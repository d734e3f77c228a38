//! Student use-case service.
//!
//! # Responsibility
//! - Provide register/lookup/update/delete entry points for students.
//! - Offer patch-based updates that re-fetch before mutating.
//! - Expose inverse association views (students per branch/event).
//!
//! # Invariants
//! - Updates are full-record replaces; patches are merged onto a fresh read.
//! - "Branch and event exist" registration preconditions belong to callers.

use crate::model::branch::BranchId;
use crate::model::event::EventId;
use crate::model::student::{Student, StudentId, StudentPatch, StudentRecord};
use crate::repo::student_repo::StudentRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

const ENTITY: &str = "Student";

/// Use-case service wrapper for student operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new student and returns the generated id.
    ///
    /// `student.id` is ignored. Branch and event references must point to
    /// existing rows; dangling references fail the whole registration.
    pub fn register_student(&self, student: &Student) -> ServiceResult<StudentId> {
        let id = self
            .repo
            .save_student(student)
            .map_err(|err| ServiceError::from_repo("Failed to register student", err))?;
        info!("event=student_register module=service status=ok student_id={id}");
        Ok(id)
    }

    pub fn student_exists(&self, id: StudentId) -> ServiceResult<bool> {
        self.repo.student_exists(id).map_err(|err| {
            ServiceError::from_repo(
                format!("Error checking if student with ID {id} exists"),
                err,
            )
        })
    }

    /// Loads one student.
    ///
    /// # Errors
    /// - `NotFound` when no student has this id.
    pub fn get_student_by_id(&self, id: StudentId) -> ServiceResult<Student> {
        self.repo
            .get_student(id)
            .map_err(|err| {
                ServiceError::from_repo(format!("Error fetching student with ID {id}"), err)
            })?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    /// Loads one student with branch and events resolved.
    pub fn get_student_record(&self, id: StudentId) -> ServiceResult<StudentRecord> {
        self.repo
            .get_student_record(id)
            .map_err(|err| {
                ServiceError::from_repo(format!("Error fetching student with ID {id}"), err)
            })?
            .ok_or(ServiceError::NotFound { entity: ENTITY, id })
    }

    pub fn get_all_students(&self) -> ServiceResult<Vec<Student>> {
        self.repo
            .list_students()
            .map_err(|err| ServiceError::from_repo("Error fetching student records", err))
    }

    pub fn get_all_student_records(&self) -> ServiceResult<Vec<StudentRecord>> {
        self.repo
            .list_student_records()
            .map_err(|err| ServiceError::from_repo("Error fetching student records", err))
    }

    /// Replaces the stored record identified by `student.id`.
    pub fn update_student(&self, student: &Student) -> ServiceResult<()> {
        self.repo
            .update_student(student)
            .map_err(|err| ServiceError::from_repo("Error updating student records", err))
    }

    /// Re-fetches the student, merges `patch` and stores the result.
    ///
    /// Returns the merged record. An empty patch still round-trips through
    /// storage so callers observe the same success path.
    pub fn apply_patch(&self, id: StudentId, patch: &StudentPatch) -> ServiceResult<Student> {
        let mut student = self.get_student_by_id(id)?;
        patch.apply_to(&mut student);
        self.update_student(&student)?;
        info!(
            "event=student_patch module=service status=ok student_id={} empty_patch={}",
            id,
            patch.is_empty()
        );
        Ok(student)
    }

    /// Deletes a student.
    ///
    /// # Errors
    /// - `NotFound` when no student has this id.
    pub fn delete_student(&self, id: StudentId) -> ServiceResult<()> {
        self.repo
            .delete_student(id)
            .map_err(|err| ServiceError::from_repo("Error deleting student records", err))
    }

    /// Students currently assigned to `branch_id`.
    pub fn students_in_branch(&self, branch_id: BranchId) -> ServiceResult<Vec<Student>> {
        self.repo
            .list_students_in_branch(branch_id)
            .map_err(|err| ServiceError::from_repo("Error fetching students of branch", err))
    }

    /// Students attending `event_id`.
    pub fn students_for_event(&self, event_id: EventId) -> ServiceResult<Vec<Student>> {
        self.repo
            .list_students_for_event(event_id)
            .map_err(|err| ServiceError::from_repo("Error fetching students of event", err))
    }
}
