//! Roster domain model.
//!
//! # Responsibility
//! - Define the typed column schema, the record shape and the table.
//! - Keep form validation rules next to the fields they guard.
//!
//! # Invariants
//! - Every row is identified by a unique integer `id`.
//! - `average` is always derived from the three grade inputs.

pub mod column;
pub mod record;
pub mod table;
pub mod validation;
