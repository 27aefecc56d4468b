use std::sync::Mutex;

use rusqlite::{Connection, Result};

use crate::db::migrations::MigrationRunner;

/// Single-writer handle over the journal database. The mutex serializes
/// every read and write, which is all the concurrency this crate promises.
pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Ephemeral database for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        let runner = MigrationRunner::new();
        let applied = runner.run_pending_migrations(&conn)?;
        if applied > 0 {
            log::info!("applied {} migrations", applied);
        } else {
            log::debug!("database schema is up to date");
        }
        runner.verify_migrations(&conn)?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }
}
