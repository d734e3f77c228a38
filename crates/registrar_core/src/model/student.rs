//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record and its owning-side associations.
//! - Provide write-path validation and patch merging.
//!
//! # Invariants
//! - `event_ids` never contains duplicates (set semantics).
//! - `branch_id = None` means "not assigned", never "unknown".
//! - `phone` is ten digits and `email` is syntactically valid once validated.

use crate::model::branch::{Branch, BranchId};
use crate::model::event::{Event, EventId};
use crate::validation::{format_date, is_valid_email, is_valid_phone, is_valid_string};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned student identifier.
pub type StudentId = i64;

/// Placeholder id carried by records that were not persisted yet.
pub const UNSAVED_STUDENT_ID: StudentId = 0;

/// Canonical student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Assigned by the store on registration; ignored on insert.
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    /// Exactly ten decimal digits.
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Serialized as `yyyy-MM-dd`.
    pub dob: NaiveDate,
    pub age: u32,
    pub branch_id: Option<BranchId>,
    pub event_ids: BTreeSet<EventId>,
}

impl Student {
    /// Creates an unsaved student without branch or events.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        dob: NaiveDate,
        age: u32,
    ) -> Self {
        Self {
            id: UNSAVED_STUDENT_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: email.into(),
            address: address.into(),
            dob,
            age,
            branch_id: None,
            event_ids: BTreeSet::new(),
        }
    }

    /// Checks field syntax before any write.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if !is_valid_string(&self.first_name) {
            return Err(StudentValidationError::BlankField("first_name"));
        }
        if !is_valid_string(&self.last_name) {
            return Err(StudentValidationError::BlankField("last_name"));
        }
        if !is_valid_string(&self.address) {
            return Err(StudentValidationError::BlankField("address"));
        }
        if !is_valid_phone(&self.phone) {
            return Err(StudentValidationError::InvalidPhone(self.phone.clone()));
        }
        if !is_valid_email(&self.email) {
            return Err(StudentValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Student: id={}, firstName={}, lastName={}, phoneNo={}, email={}, address={}, dob={}, age={}",
            self.id,
            self.first_name,
            self.last_name,
            self.phone,
            self.email,
            self.address,
            format_date(self.dob),
            self.age
        )
    }
}

/// Field-level validation failure for student writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    BlankField(&'static str),
    InvalidPhone(String),
    InvalidEmail(String),
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "student {field} must not be blank"),
            Self::InvalidPhone(value) => {
                write!(f, "invalid phone number `{value}`: expected 10 digits")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for StudentValidationError {}

/// Partial update for an existing student.
///
/// `None` keeps the current value. `branch_id: Some(None)` clears the branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub age: Option<u32>,
    pub branch_id: Option<Option<BranchId>>,
    pub event_ids: Option<BTreeSet<EventId>>,
}

impl StudentPatch {
    /// Returns true when applying this patch cannot change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges replacement values into `student`.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(value) = &self.first_name {
            student.first_name = value.clone();
        }
        if let Some(value) = &self.last_name {
            student.last_name = value.clone();
        }
        if let Some(value) = &self.phone {
            student.phone = value.clone();
        }
        if let Some(value) = &self.email {
            student.email = value.clone();
        }
        if let Some(value) = &self.address {
            student.address = value.clone();
        }
        if let Some(value) = self.dob {
            student.dob = value;
        }
        if let Some(value) = self.age {
            student.age = value;
        }
        if let Some(value) = self.branch_id {
            student.branch_id = value;
        }
        if let Some(value) = &self.event_ids {
            student.event_ids = value.clone();
        }
    }
}

/// Read model: a student with its associations resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub student: Student,
    pub branch: Option<Branch>,
    /// Ordered by event id.
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::{Student, StudentPatch, StudentValidationError};
    use chrono::NaiveDate;

    fn alice() -> Student {
        Student::new(
            "Alice",
            "Doe",
            "9876543210",
            "alice@example.com",
            "1 Main St",
            NaiveDate::from_ymd_opt(2004, 5, 17).unwrap(),
            20,
        )
    }

    #[test]
    fn new_student_has_no_associations() {
        let student = alice();
        assert_eq!(student.branch_id, None);
        assert!(student.event_ids.is_empty());
        assert!(student.validate().is_ok());
    }

    #[test]
    fn validate_reports_first_invalid_field() {
        let mut student = alice();
        student.phone = "12345".to_string();
        assert_eq!(
            student.validate(),
            Err(StudentValidationError::InvalidPhone("12345".to_string()))
        );

        let mut student = alice();
        student.last_name = "   ".to_string();
        assert_eq!(
            student.validate(),
            Err(StudentValidationError::BlankField("last_name"))
        );
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let original = alice();
        let mut patched = original.clone();
        let patch = StudentPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut patched);
        assert_eq!(patched, original);
    }

    #[test]
    fn patch_replaces_only_provided_fields() {
        let mut student = alice();
        student.branch_id = Some(4);
        let patch = StudentPatch {
            phone: Some("1112223333".to_string()),
            age: Some(21),
            branch_id: Some(None),
            ..StudentPatch::default()
        };
        patch.apply_to(&mut student);

        assert_eq!(student.phone, "1112223333");
        assert_eq!(student.age, 21);
        assert_eq!(student.branch_id, None);
        assert_eq!(student.first_name, "Alice");
    }

    #[test]
    fn serializes_dob_as_plain_date() {
        let value = serde_json::to_value(alice()).unwrap();
        assert_eq!(value["dob"], "2004-05-17");
        assert_eq!(value["event_ids"], serde_json::json!([]));
    }
}
