//! Subway domain model.
//!
//! # Responsibility
//! - Define the station and line records shared by repositories and services.
//! - Own field-level validation rules applied before persistence.
//!
//! # Invariants
//! - Identifiers are assigned by the store, never by callers.
//! - Lines reference stations by id; stations never hold line references.

pub mod line;
pub mod station;
