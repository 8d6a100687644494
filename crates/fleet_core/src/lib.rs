//! Core domain logic for fleet vehicle records.
//! This crate is the single source of truth for vehicle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, flush_logging, init_logging, logging_status, LoggingError,
};
pub use model::vehicle::{Vehicle, VehicleId, VehicleValidationError};
pub use repo::memory_repo::MemoryVehicleRepository;
pub use repo::vehicle_repo::{
    RepoError, RepoResult, SqliteVehicleRepository, VehicleListQuery, VehicleRepository,
};
pub use service::vehicle_service::{VehiclePatch, VehicleService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
