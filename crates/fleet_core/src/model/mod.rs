//! Domain model for fleet records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Stay independent of any storage technology.
//!
//! # Invariants
//! - Every persisted record is identified by a storage-assigned `VehicleId`.
//! - Deletion is a hard delete; ids are never reused.
//!
//! # See also
//! - crate::db::schema

pub mod vehicle;
