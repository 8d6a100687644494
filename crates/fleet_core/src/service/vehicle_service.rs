//! Vehicle use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::vehicle::{Vehicle, VehicleId};
use crate::repo::vehicle_repo::{RepoError, RepoResult, VehicleListQuery, VehicleRepository};

/// Partial update for an existing vehicle.
///
/// `None` keeps the stored value. For optional columns, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclePatch {
    pub plate: Option<String>,
    pub brand: Option<Option<String>>,
    pub model: Option<String>,
    pub year: Option<Option<i32>>,
}

impl VehiclePatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.plate.is_none() && self.brand.is_none() && self.model.is_none() && self.year.is_none()
    }

    fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(plate) = &self.plate {
            vehicle.plate = plate.clone();
        }
        if let Some(brand) = &self.brand {
            vehicle.brand = brand.clone();
        }
        if let Some(model) = &self.model {
            vehicle.model = model.clone();
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
    }
}

/// Use-case service wrapper for vehicle CRUD operations.
pub struct VehicleService<R: VehicleRepository> {
    repo: R,
}

impl<R: VehicleRepository> VehicleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new vehicle and returns its storage-assigned id.
    ///
    /// # Errors
    /// - `Validation` for blank required fields or over-long text.
    /// - `DuplicatePlate` when the plate is already registered.
    pub fn register_vehicle(
        &self,
        plate: impl Into<String>,
        model: impl Into<String>,
        brand: Option<String>,
        year: Option<i32>,
    ) -> RepoResult<VehicleId> {
        let mut vehicle = Vehicle::new(plate, model);
        vehicle.brand = brand;
        vehicle.year = year;
        self.repo.create_vehicle(&vehicle)
    }

    /// Creates a prepared, unsaved vehicle.
    pub fn create_vehicle(&self, vehicle: &Vehicle) -> RepoResult<VehicleId> {
        self.repo.create_vehicle(vehicle)
    }

    /// Replaces an existing vehicle by id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_vehicle(&self, vehicle: &Vehicle) -> RepoResult<()> {
        self.repo.update_vehicle(vehicle)
    }

    /// Applies a partial update and returns the stored result.
    pub fn patch_vehicle(&self, id: VehicleId, patch: &VehiclePatch) -> RepoResult<Vehicle> {
        let mut vehicle = self.repo.get_vehicle(id)?.ok_or(RepoError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(vehicle);
        }

        patch.apply_to(&mut vehicle);
        self.repo.update_vehicle(&vehicle)?;
        Ok(vehicle)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        self.repo.get_vehicle(id)
    }

    pub fn find_by_plate(&self, plate: &str) -> RepoResult<Option<Vehicle>> {
        self.repo.find_by_plate(plate)
    }

    /// Lists vehicles using brand filter and pagination options.
    pub fn list_vehicles(&self, query: &VehicleListQuery) -> RepoResult<Vec<Vehicle>> {
        self.repo.list_vehicles(query)
    }

    pub fn delete_vehicle(&self, id: VehicleId) -> RepoResult<()> {
        self.repo.delete_vehicle(id)
    }

    pub fn count_vehicles(&self) -> RepoResult<u64> {
        self.repo.count_vehicles()
    }
}
