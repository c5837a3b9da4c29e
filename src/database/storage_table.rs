use const_format::concatcp;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params, Result, Transaction};

// Single-slot key-value store. Every slot holds one serialized value that is
// fully overwritten on write.
const CREATE_STORAGE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS storage (
        key TEXT NOT NULL PRIMARY KEY,
        value TEXT NOT NULL
    )";

const INSERT_SLOT: &str =
    "INSERT INTO storage (key, value) VALUES (?, ?)";

const UPSERT_SLOT: &str =
    concatcp!(INSERT_SLOT, " \
     ON CONFLICT(key) DO \
     UPDATE SET value = excluded.value");

const SELECT_SLOT: &str =
    "SELECT value FROM storage WHERE key = ?";

// This is just a namespace to keep method names short
pub struct StorageTable;

impl StorageTable {
    pub fn create_table(conn: &Connection) -> Result<()> {
        debug!("Execute\n{}", CREATE_STORAGE_TABLE);
        conn.execute(CREATE_STORAGE_TABLE, [])?;
        Ok(())
    }

    pub fn upsert(tx: &Transaction, key: &str, value: &str) -> Result<()> {
        debug!("Execute\n{} with key: {}", UPSERT_SLOT, key);
        tx.execute(UPSERT_SLOT, params![key, value])?;
        Ok(())
    }

    pub fn select(tx: &Transaction, key: &str) -> Result<Option<String>> {
        debug!("Execute\n{} with key: {}", SELECT_SLOT, key);
        let mut stmt = tx.prepare(SELECT_SLOT)?;
        stmt.query_row(params![key], |row| {
            Ok(row.get(0)?)
        }).optional()
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use crate::database::storage_table::StorageTable;

    #[test]
    fn test_upsert_initial() {
        let mut conn = create_connection_and_table();
        let tx = conn.transaction().unwrap();
        assert!(StorageTable::upsert(&tx, "workouts", "[]").is_ok());
        assert!(tx.commit().is_ok());

        check_result(&mut conn, "workouts", "[]");
    }

    #[test]
    fn test_upsert_overwrites() {
        let mut conn = create_connection_and_table();
        let tx = conn.transaction().unwrap();
        assert!(StorageTable::upsert(&tx, "workouts", "foo").is_ok());
        assert!(StorageTable::upsert(&tx, "workouts", "bar").is_ok());
        assert!(tx.commit().is_ok());

        check_result(&mut conn, "workouts", "bar");
    }

    #[test]
    fn test_slots_are_independent() {
        let mut conn = create_connection_and_table();
        let tx = conn.transaction().unwrap();
        assert!(StorageTable::upsert(&tx, "workouts", "foo").is_ok());
        assert!(StorageTable::upsert(&tx, "other", "bar").is_ok());
        assert!(tx.commit().is_ok());

        check_result(&mut conn, "workouts", "foo");
        check_result(&mut conn, "other", "bar");
    }

    #[test]
    fn test_select_empty() {
        let mut conn = create_connection_and_table();
        let tx = conn.transaction().unwrap();
        let value = StorageTable::select(&tx, "workouts");
        assert!(tx.commit().is_ok());
        assert!(value.is_ok());
        assert!(value.unwrap().is_none());
    }

    fn create_connection_and_table() -> Connection {
        let conn = Connection::open(":memory:");
        assert!(conn.is_ok());
        let conn = conn.unwrap();
        assert!(StorageTable::create_table(&conn).is_ok());
        conn
    }

    fn check_result(conn: &mut Connection, key: &str, reference: &str) {
        let tx = conn.transaction().unwrap();
        let value = StorageTable::select(&tx, key);
        assert!(tx.commit().is_ok());
        assert!(value.is_ok());
        let value = value.unwrap();
        assert!(value.is_some());
        assert_eq!(value.unwrap(), reference);
    }
}
