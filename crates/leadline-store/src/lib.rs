pub mod backup;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

const BUSY_TIMEOUT_MS: u32 = 2_000;

/// SQLite handle plus the repositories hanging off it. WAL keeps list
/// queries readable while a lifecycle write is in flight; the busy timeout
/// absorbs short lock contention between processes sharing the file.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self::configure(Connection::open(path)?)?;
        // The WAL switch above has materialized the file, so the chmod
        // applies even on a first open.
        paths::restrict_file_permissions(path)?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn backup_to(&self, path: &Path) -> Result<()> {
        backup::backup_to(&self.conn, path)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn agents(&self) -> repo::AgentsRepo<'_> {
        repo::AgentsRepo::new(&self.conn)
    }

    pub fn leads(&self) -> repo::LeadsRepo<'_> {
        repo::LeadsRepo::new(&self.conn)
    }

    pub fn follow_ups(&self) -> repo::FollowUpsRepo<'_> {
        repo::FollowUpsRepo::new(&self.conn)
    }

    pub fn rotation(&self) -> repo::RotationRepo<'_> {
        repo::RotationRepo::new(&self.conn)
    }
}
