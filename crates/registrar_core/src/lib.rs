//! Core domain logic for the student registrar.
//! This crate is the single source of truth for registration invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use db::{open_db, open_db_in_memory, DbError, Store};
pub use logging::{default_log_level, init_logging};
pub use model::branch::{Branch, BranchId};
pub use model::event::{Event, EventId};
pub use model::student::{
    Student, StudentId, StudentPatch, StudentRecord, StudentValidationError,
};
pub use repo::branch_repo::{BranchRepository, SqliteBranchRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::branch_service::BranchService;
pub use service::event_service::EventService;
pub use service::student_service::StudentService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
