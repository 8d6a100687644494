//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator contract for vehicles.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Vehicle::validate()` before persistence.
//! - Every implementation reports duplicate plates as `DuplicatePlate`.

pub mod memory_repo;
pub mod vehicle_repo;
