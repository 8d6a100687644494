//! Vehicle domain model.
//!
//! # Responsibility
//! - Define the canonical in-memory shape of one vehicle record.
//! - Own field-level validation (required fields, max lengths).
//!
//! # Invariants
//! - `id` is assigned by storage on insert and is never caller-supplied.
//! - `plate` and `model` are always present on a valid record.
//! - `brand` and `year` absence is `None`, never a default value.
//!
//! # See also
//! - crate::db::schema::VEHICLES_TABLE

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate key assigned by storage.
pub type VehicleId = i64;

/// Max plate length in characters.
pub const PLATE_MAX_CHARS: usize = 10;
/// Max brand length in characters.
pub const BRAND_MAX_CHARS: usize = 50;
/// Max model length in characters.
pub const MODEL_MAX_CHARS: usize = 50;

/// Field-level validation failures for [`Vehicle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleValidationError {
    /// A required field is absent (missing, null or blank).
    MissingField(&'static str),
    /// A text field exceeds its declared max length.
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl Display for VehicleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "vehicle field `{field}` is required"),
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "vehicle field `{field}` exceeds {max} characters (got {actual})"
            ),
        }
    }
}

impl Error for VehicleValidationError {}

/// Canonical vehicle record.
///
/// Structural `PartialEq` compares every field; use [`Vehicle::same_record`]
/// for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VehicleWire")]
pub struct Vehicle {
    /// `None` until storage assigns an id.
    pub id: Option<VehicleId>,
    /// Natural key, unique across all records.
    pub plate: String,
    pub brand: Option<String>,
    pub model: String,
    pub year: Option<i32>,
}

impl Vehicle {
    /// Creates an unsaved vehicle with required fields only.
    ///
    /// Does not validate; persistence paths call [`Vehicle::validate`].
    pub fn new(plate: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: None,
            plate: plate.into(),
            brand: None,
            model: model.into(),
            year: None,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Returns whether storage has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns whether both values refer to the same stored record.
    ///
    /// Unsaved vehicles never match anything, including themselves.
    pub fn same_record(&self, other: &Vehicle) -> bool {
        matches!((self.id, other.id), (Some(left), Some(right)) if left == right)
    }

    /// Validates required fields and declared max lengths.
    ///
    /// # Errors
    /// - `MissingField` when `plate` or `model` is blank (checked in that order).
    /// - `FieldTooLong` when `plate`, `brand` or `model` exceeds its limit.
    pub fn validate(&self) -> Result<(), VehicleValidationError> {
        require_present("plate", &self.plate)?;
        require_present("model", &self.model)?;
        check_max_chars("plate", &self.plate, PLATE_MAX_CHARS)?;
        if let Some(brand) = self.brand.as_deref() {
            check_max_chars("brand", brand, BRAND_MAX_CHARS)?;
        }
        check_max_chars("model", &self.model, MODEL_MAX_CHARS)?;
        Ok(())
    }
}

impl Display for Vehicle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Vehicle id={} plate={} brand={} model={} year={}>",
            DisplayOpt(self.id.as_ref()),
            self.plate,
            DisplayOpt(self.brand.as_ref()),
            self.model,
            DisplayOpt(self.year.as_ref()),
        )
    }
}

struct DisplayOpt<'a, T>(Option<&'a T>);

impl<T: Display> Display for DisplayOpt<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

/// Deserialization shape; required fields stay optional here so absence is
/// reported as a validation error instead of a generic serde error.
#[derive(Deserialize)]
struct VehicleWire {
    #[serde(default)]
    id: Option<VehicleId>,
    #[serde(default)]
    plate: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

impl TryFrom<VehicleWire> for Vehicle {
    type Error = VehicleValidationError;

    fn try_from(wire: VehicleWire) -> Result<Self, Self::Error> {
        let vehicle = Vehicle {
            id: wire.id,
            plate: wire.plate.ok_or(VehicleValidationError::MissingField("plate"))?,
            brand: wire.brand,
            model: wire.model.ok_or(VehicleValidationError::MissingField("model"))?,
            year: wire.year,
        };
        vehicle.validate()?;
        Ok(vehicle)
    }
}

fn require_present(field: &'static str, value: &str) -> Result<(), VehicleValidationError> {
    if value.trim().is_empty() {
        return Err(VehicleValidationError::MissingField(field));
    }
    Ok(())
}

fn check_max_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), VehicleValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(VehicleValidationError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_max_chars, Vehicle, VehicleValidationError};

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        // 10 multi-byte characters.
        assert!(check_max_chars("plate", "ÄÖÜÄÖÜÄÖÜÄ", 10).is_ok());
    }

    #[test]
    fn blank_plate_is_reported_before_blank_model() {
        let vehicle = Vehicle::new("  ", "");
        assert_eq!(
            vehicle.validate().unwrap_err(),
            VehicleValidationError::MissingField("plate")
        );
    }
}
