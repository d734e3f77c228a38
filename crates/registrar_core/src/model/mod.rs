//! Registration domain model.
//!
//! # Responsibility
//! - Define the value records exchanged between repositories, services and UI.
//! - Keep associations one-directional: a student owns its branch id and
//!   event ids; inverse views are computed by query.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused for another record.
//! - Branch and event names are unique case-insensitively.

pub mod branch;
pub mod event;
pub mod student;
