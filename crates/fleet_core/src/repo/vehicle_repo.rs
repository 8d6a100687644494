//! Vehicle repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `vehicles` storage.
//! - Keep SQL details inside core persistence boundary.
//! - Translate storage constraint failures into semantic errors.
//!
//! # Invariants
//! - Write paths must call `Vehicle::validate()` before SQL mutations.
//! - Plate uniqueness is enforced by storage, never pre-checked here.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::schema::{table_columns, table_exists, VEHICLES_TABLE};
use crate::db::DbError;
use crate::model::vehicle::{Vehicle, VehicleId, VehicleValidationError};
use log::{info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const VEHICLE_SELECT_SQL: &str = "SELECT
    id,
    plate,
    brand,
    model,
    year
FROM vehicles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for vehicle persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field validation; nothing was written.
    Validation(VehicleValidationError),
    /// Another record already holds this plate; nothing was written.
    DuplicatePlate(String),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No record with this id.
    NotFound(VehicleId),
    /// Update requires a persisted record.
    MissingId,
    /// Create refuses caller-supplied ids.
    IdAlreadyAssigned(VehicleId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid vehicle.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether the write was rejected for missing or over-long fields.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns whether the write was rejected for a duplicate plate.
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Self::DuplicatePlate(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicatePlate(plate) => write!(f, "vehicle plate already exists: {plate}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "vehicle not found: {id}"),
            Self::MissingId => write!(f, "vehicle has no id; create it before updating"),
            Self::IdAlreadyAssigned(id) => {
                write!(f, "vehicle id {id} is assigned by storage, not by callers")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "vehicle repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "vehicle repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "vehicle repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted vehicle data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VehicleValidationError> for RepoError {
    fn from(value: VehicleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing vehicles.
///
/// Results are ordered by `id` ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleListQuery {
    /// Exact brand match. Vehicles without a brand never match.
    pub brand: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for vehicle CRUD operations.
pub trait VehicleRepository {
    /// Validates and inserts a new vehicle, returning the storage-assigned id.
    fn create_vehicle(&self, vehicle: &Vehicle) -> RepoResult<VehicleId>;
    /// Validates and fully replaces an existing vehicle by id.
    fn update_vehicle(&self, vehicle: &Vehicle) -> RepoResult<()>;
    fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>>;
    /// Looks up a vehicle by its natural key.
    fn find_by_plate(&self, plate: &str) -> RepoResult<Option<Vehicle>>;
    fn list_vehicles(&self, query: &VehicleListQuery) -> RepoResult<Vec<Vehicle>>;
    /// Hard-deletes a vehicle. Its id is never handed out again.
    fn delete_vehicle(&self, id: VehicleId) -> RepoResult<()>;
    fn count_vehicles(&self) -> RepoResult<u64>;
}

/// SQLite-backed vehicle repository.
pub struct SqliteVehicleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVehicleRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema does
    ///   not match the `vehicles` mapping.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_vehicle_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl VehicleRepository for SqliteVehicleRepository<'_> {
    fn create_vehicle(&self, vehicle: &Vehicle) -> RepoResult<VehicleId> {
        if let Some(id) = vehicle.id {
            return Err(RepoError::IdAlreadyAssigned(id));
        }
        vehicle.validate()?;

        let id = self
            .conn
            .query_row(
                "INSERT INTO vehicles (plate, brand, model, year)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id;",
                params![
                    vehicle.plate.as_str(),
                    vehicle.brand.as_deref(),
                    vehicle.model.as_str(),
                    vehicle.year,
                ],
                |row| row.get::<_, VehicleId>(0),
            )
            .map_err(|err| map_write_error(err, &vehicle.plate))?;

        info!("event=vehicle_create module=repo backend=sqlite status=ok id={id}");
        Ok(id)
    }

    fn update_vehicle(&self, vehicle: &Vehicle) -> RepoResult<()> {
        let id = vehicle.id.ok_or(RepoError::MissingId)?;
        vehicle.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE vehicles
                 SET
                    plate = ?1,
                    brand = ?2,
                    model = ?3,
                    year = ?4
                 WHERE id = ?5;",
                params![
                    vehicle.plate.as_str(),
                    vehicle.brand.as_deref(),
                    vehicle.model.as_str(),
                    vehicle.year,
                    id,
                ],
            )
            .map_err(|err| map_write_error(err, &vehicle.plate))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=vehicle_update module=repo backend=sqlite status=ok id={id}");
        Ok(())
    }

    fn get_vehicle(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        self.query_one(&format!("{VEHICLE_SELECT_SQL} WHERE id = ?1;"), Value::Integer(id))
    }

    fn find_by_plate(&self, plate: &str) -> RepoResult<Option<Vehicle>> {
        self.query_one(
            &format!("{VEHICLE_SELECT_SQL} WHERE plate = ?1;"),
            Value::Text(plate.to_string()),
        )
    }

    fn list_vehicles(&self, query: &VehicleListQuery) -> RepoResult<Vec<Vehicle>> {
        let mut sql = format!("{VEHICLE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(brand) = query.brand.as_deref() {
            sql.push_str(" AND brand = ?");
            bind_values.push(Value::Text(brand.to_string()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut vehicles = Vec::new();

        while let Some(row) = rows.next()? {
            vehicles.push(parse_vehicle_row(row)?);
        }

        Ok(vehicles)
    }

    fn delete_vehicle(&self, id: VehicleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM vehicles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=vehicle_delete module=repo backend=sqlite status=ok id={id}");
        Ok(())
    }

    fn count_vehicles(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicles;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative vehicle count `{count}`")))
    }
}

impl SqliteVehicleRepository<'_> {
    fn query_one(&self, sql: &str, key: Value) -> RepoResult<Option<Vehicle>> {
        let mut stmt = self.conn.prepare(sql)?;
        let row = stmt
            .query_row([key], |row| Ok(parse_vehicle_row(row)))
            .optional()?;
        row.transpose()
    }
}

fn parse_vehicle_row(row: &Row<'_>) -> RepoResult<Vehicle> {
    let id: VehicleId = row.get("id")?;

    // Stored as a 64-bit INTEGER; the model holds `i32`.
    let year = match row.get::<_, Option<i64>>("year")? {
        Some(value) => Some(i32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "vehicles row {id}: year `{value}` is out of range"
            ))
        })?),
        None => None,
    };

    let vehicle = Vehicle {
        id: Some(id),
        plate: row.get("plate")?,
        brand: row.get("brand")?,
        model: row.get("model")?,
        year,
    };
    vehicle
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("vehicles row {id}: {err}")))?;
    Ok(vehicle)
}

fn map_write_error(err: rusqlite::Error, plate: &str) -> RepoError {
    let err = DbError::Sqlite(err);
    if err.sqlite_extended_code() == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
        // Plate values are not logged.
        warn!("event=vehicle_write module=repo backend=sqlite status=rejected error_code=duplicate_plate");
        return RepoError::DuplicatePlate(plate.to_string());
    }
    RepoError::Db(err)
}

fn ensure_vehicle_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, VEHICLES_TABLE.name)? {
        return Err(RepoError::MissingRequiredTable(VEHICLES_TABLE.name));
    }

    let present = table_columns(conn, VEHICLES_TABLE.name)?;
    for column in VEHICLES_TABLE.column_names() {
        if !present.iter().any(|info| info.name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: VEHICLES_TABLE.name,
                column,
            });
        }
    }

    Ok(())
}
