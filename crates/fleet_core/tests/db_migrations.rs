use fleet_core::db::migrations::latest_version;
use fleet_core::db::schema::{table_columns, table_exists, SqlType, VEHICLES_TABLE};
use fleet_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert!(table_exists(&conn, "vehicles").unwrap());
}

#[test]
fn migrated_table_matches_mapping_declaration() {
    let conn = open_db_in_memory().unwrap();
    let columns = table_columns(&conn, VEHICLES_TABLE.name).unwrap();

    let names: Vec<_> = columns.iter().map(|column| column.name.as_str()).collect();
    let declared: Vec<_> = VEHICLES_TABLE.column_names().collect();
    assert_eq!(names, declared);

    for info in &columns {
        let spec = VEHICLES_TABLE.column(&info.name).unwrap();
        assert_eq!(info.declared_type, spec.sql_type.as_sql(), "{}", info.name);
        assert_eq!(info.primary_key, spec.primary_key, "{}", info.name);
        if !spec.primary_key {
            assert_eq!(info.not_null, !spec.nullable, "{}", info.name);
        }
    }
}

#[test]
fn plate_has_a_unique_index() {
    let conn = open_db_in_memory().unwrap();
    let mut stmt = conn.prepare("PRAGMA index_list(vehicles);").unwrap();
    let unique_indexes: Vec<String> = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(2)?)))
        .unwrap()
        .map(|row| row.unwrap())
        .filter(|(_, unique)| *unique == 1)
        .map(|(name, _)| name)
        .collect();
    assert_eq!(unique_indexes.len(), 1);

    let indexed: String = conn
        .query_row(
            &format!("PRAGMA index_info({});", unique_indexes[0]),
            [],
            |row| row.get(2),
        )
        .unwrap();
    assert_eq!(indexed, "plate");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fleet.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO vehicles (plate, model) VALUES ('ABC1234', 'Civic');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM vehicles;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sql_type_names_match_sqlite_declarations() {
    assert_eq!(SqlType::Integer.as_sql(), "INTEGER");
    assert_eq!(SqlType::Text.as_sql(), "TEXT");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
