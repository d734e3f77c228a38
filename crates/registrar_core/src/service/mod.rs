//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce application-level invariants (unique names, existence checks).
//! - Translate persistence failures into context-carrying service errors.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod branch_service;
pub mod event_service;
pub mod student_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by branch/event/student services.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input failed a service-side gate.
    InvalidInput(String),
    /// Another record already uses this name (case-insensitive).
    Duplicate { entity: &'static str, name: String },
    /// Target record does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Persistence failure wrapped with use-case context.
    Operation { context: String, source: RepoError },
}

impl ServiceError {
    /// Wraps a repository error with `context`.
    ///
    /// Not-found and validation failures keep their own meaning instead of
    /// being folded into a generic operation failure.
    pub fn from_repo(context: impl Into<String>, err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Validation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Operation {
                context: context.into(),
                source: other,
            },
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Duplicate { entity, name } => write!(f, "{entity} '{name}' already exists"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found with ID: {id}"),
            Self::Operation { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::from_repo("operation failed", value)
    }
}

/// Trims a record name and rejects blank values.
fn normalize_name(entity: &str, name: &str) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "{} name must not be blank",
            entity.to_lowercase()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, ServiceError};
    use crate::db::DbError;
    use crate::model::student::StudentValidationError;
    use crate::repo::RepoError;
    use std::error::Error;

    #[test]
    fn from_repo_keeps_not_found_semantics() {
        let err = ServiceError::from_repo(
            "Error deleting student records",
            RepoError::NotFound {
                entity: "Student",
                id: 9,
            },
        );
        assert!(matches!(err, ServiceError::NotFound { id: 9, .. }));
        assert_eq!(err.to_string(), "Student not found with ID: 9");
    }

    #[test]
    fn from_repo_wraps_db_errors_with_context() {
        let err = ServiceError::from_repo(
            "Error updating branch records",
            RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery)),
        );
        assert!(err
            .to_string()
            .starts_with("Error updating branch records: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn from_repo_maps_validation_to_invalid_input() {
        let err = ServiceError::from_repo(
            "Failed to register student",
            RepoError::Validation(StudentValidationError::InvalidEmail("x".to_string())),
        );
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn normalize_name_trims_and_rejects_blank() {
        assert_eq!(normalize_name("Branch", "  CS ").unwrap(), "CS");
        let err = normalize_name("Branch", "   ").unwrap_err();
        assert_eq!(err.to_string(), "branch name must not be blank");
    }
}
