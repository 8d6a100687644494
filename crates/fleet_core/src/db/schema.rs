//! Table mapping declarations for persisted models.
//!
//! # Responsibility
//! - Declare how `Vehicle` maps onto the `vehicles` table.
//! - Give repositories one place to check a connection's shape against.
//!
//! # Invariants
//! - Column order matches `Vehicle` field order.
//! - Migration SQL must realize exactly this declaration.

use crate::model::vehicle::{BRAND_MAX_CHARS, MODEL_MAX_CHARS, PLATE_MAX_CHARS};
use rusqlite::Connection;

/// SQLite storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// One mapped column and its declared constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    /// Max length in characters for text columns.
    pub max_chars: Option<usize>,
    /// Inclusive bounds for integer columns narrower than SQLite's 64 bits.
    pub int_range: Option<(i64, i64)>,
    pub unique: bool,
    /// Storage-generated surrogate key.
    pub primary_key: bool,
}

/// One mapped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        let columns: &'static [ColumnSpec] = self.columns;
        columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        let columns: &'static [ColumnSpec] = self.columns;
        columns.iter().map(|column| column.name)
    }
}

pub const VEHICLES_TABLE: TableSpec = TableSpec {
    name: "vehicles",
    columns: &[
        ColumnSpec {
            name: "id",
            sql_type: SqlType::Integer,
            nullable: false,
            max_chars: None,
            int_range: None,
            unique: true,
            primary_key: true,
        },
        ColumnSpec {
            name: "plate",
            sql_type: SqlType::Text,
            nullable: false,
            max_chars: Some(PLATE_MAX_CHARS),
            int_range: None,
            unique: true,
            primary_key: false,
        },
        ColumnSpec {
            name: "brand",
            sql_type: SqlType::Text,
            nullable: true,
            max_chars: Some(BRAND_MAX_CHARS),
            int_range: None,
            unique: false,
            primary_key: false,
        },
        ColumnSpec {
            name: "model",
            sql_type: SqlType::Text,
            nullable: false,
            max_chars: Some(MODEL_MAX_CHARS),
            int_range: None,
            unique: false,
            primary_key: false,
        },
        ColumnSpec {
            name: "year",
            sql_type: SqlType::Integer,
            nullable: true,
            max_chars: None,
            int_range: Some((i32::MIN as i64, i32::MAX as i64)),
            unique: false,
            primary_key: false,
        },
    ],
};

/// Column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Lists the physical columns of `table` in declaration order.
///
/// Returns an empty list when the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(ColumnInfo {
            name: row.get(1)?,
            declared_type: row.get(2)?,
            not_null: row.get::<_, i64>(3)? != 0,
            primary_key: row.get::<_, i64>(5)? != 0,
        });
    }
    Ok(columns)
}
