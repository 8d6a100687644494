//! In-memory vehicle repository.
//!
//! # Responsibility
//! - Provide the `VehicleRepository` contract without SQLite, for embedding
//!   and tests.
//!
//! # Invariants
//! - Ids are assigned from a monotonic counter and never reused.
//! - Plate uniqueness is enforced at write time, same as the UNIQUE column.
//! - A failed write leaves stored state unchanged.

use crate::model::vehicle::{Vehicle, VehicleId};
use crate::repo::vehicle_repo::{RepoError, RepoResult, VehicleListQuery, VehicleRepository};
use log::{info, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<VehicleId, Vehicle>,
    last_id: VehicleId,
}

impl MemoryTable {
    fn plate_taken(&self, plate: &str, except: Option<VehicleId>) -> bool {
        self.rows
            .values()
            .any(|row| row.plate == plate && row.id != except)
    }
}

/// Single-threaded in-memory vehicle table.
#[derive(Debug, Default)]
pub struct MemoryVehicleRepository {
    table: RefCell<MemoryTable>,
}

impl MemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VehicleRepository for MemoryVehicleRepository {
    fn create_vehicle(&self, vehicle: &Vehicle) -> RepoResult<VehicleId> {
        if let Some(id) = vehicle.id {
            return Err(RepoError::IdAlreadyAssigned(id));
        }
        vehicle.validate()?;

        let mut table = self.table.borrow_mut();
        if table.plate_taken(&vehicle.plate, None) {
            return Err(duplicate_plate(&vehicle.plate));
        }

        table.last_id += 1;
        let id = table.last_id;
        let mut stored = vehicle.clone();
        stored.id = Some(id);
        table.rows.insert(id, stored);

        info!("event=vehicle_create module=repo backend=memory status=ok id={id}");
        Ok(id)
    }

    fn update_vehicle(&self, vehicle: &Vehicle) -> RepoResult<()> {
        let id = vehicle.id.ok_or(RepoError::MissingId)?;
        vehicle.validate()?;

        let mut table = self.table.borrow_mut();
        if !table.rows.contains_key(&id) {
            return Err(RepoError::NotFound(id));
        }
        if table.plate_taken(&vehicle.plate, Some(id)) {
            return Err(duplicate_plate(&vehicle.plate));
        }

        table.rows.insert(id, vehicle.clone());

        info!("event=vehicle_update module=repo backend=memory status=ok id={id}");
        Ok(())
    }

    fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        Ok(self.table.borrow().rows.get(&id).cloned())
    }

    fn find_by_plate(&self, plate: &str) -> RepoResult<Option<Vehicle>> {
        Ok(self
            .table
            .borrow()
            .rows
            .values()
            .find(|row| row.plate == plate)
            .cloned())
    }

    fn list_vehicles(&self, query: &VehicleListQuery) -> RepoResult<Vec<Vehicle>> {
        let table = self.table.borrow();
        let matching = table.rows.values().filter(|row| match query.brand.as_deref() {
            Some(brand) => row.brand.as_deref() == Some(brand),
            None => true,
        });
        let page = matching.skip(query.offset as usize);
        let vehicles = match query.limit {
            Some(limit) => page.take(limit as usize).cloned().collect(),
            None => page.cloned().collect(),
        };
        Ok(vehicles)
    }

    fn delete_vehicle(&self, id: VehicleId) -> RepoResult<()> {
        if self.table.borrow_mut().rows.remove(&id).is_none() {
            return Err(RepoError::NotFound(id));
        }

        info!("event=vehicle_delete module=repo backend=memory status=ok id={id}");
        Ok(())
    }

    fn count_vehicles(&self) -> RepoResult<u64> {
        Ok(self.table.borrow().rows.len() as u64)
    }
}

fn duplicate_plate(plate: &str) -> RepoError {
    warn!("event=vehicle_write module=repo backend=memory status=rejected error_code=duplicate_plate");
    RepoError::DuplicatePlate(plate.to_string())
}
