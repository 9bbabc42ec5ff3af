//! Snapshot storage collaborators.
//!
//! RULE: Only storage.rs touches a persistence medium.
//! The history store sees nothing but the SnapshotStorage trait.

use crate::{error::RiskResult, snapshot::SNAPSHOT_KEY};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};

/// Narrow load/save interface for a single named snapshot.
pub trait SnapshotStorage {
    /// The stored bytes, or None if absent or unreadable.
    /// Implementations log read failures rather than returning them.
    fn load(&self) -> Option<Vec<u8>>;

    /// Overwrite the snapshot.
    fn save(&self, bytes: &[u8]) -> RiskResult<()>;

    /// Delete the snapshot. Removing an absent snapshot is not an error.
    fn remove(&self) -> RiskResult<()>;
}

impl<T: SnapshotStorage + ?Sized> SnapshotStorage for &T {
    fn load(&self) -> Option<Vec<u8>> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> RiskResult<()> {
        (**self).save(bytes)
    }

    fn remove(&self) -> RiskResult<()> {
        (**self).remove()
    }
}

impl<T: SnapshotStorage + ?Sized> SnapshotStorage for Box<T> {
    fn load(&self) -> Option<Vec<u8>> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> RiskResult<()> {
        (**self).save(bytes)
    }

    fn remove(&self) -> RiskResult<()> {
        (**self).remove()
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Process-local storage (used in tests).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot:   RefCell<Option<Vec<u8>>>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with raw bytes, as if a previous session had written them.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot:   RefCell::new(Some(bytes.into())),
            writes: Cell::new(0),
        }
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.slot.borrow().clone()
    }

    /// Number of save/remove calls seen.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Option<Vec<u8>> {
        self.bytes()
    }

    fn save(&self, bytes: &[u8]) -> RiskResult<()> {
        *self.slot.borrow_mut() = Some(bytes.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self) -> RiskResult<()> {
        *self.slot.borrow_mut() = None;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// ── SQLite ───────────────────────────────────────────────────────────────────

pub struct SqliteStorage {
    conn: Connection,
    name: String,
}

impl SqliteStorage {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> RiskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn, name: SNAPSHOT_KEY.to_string() })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RiskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, name: SNAPSHOT_KEY.to_string() })
    }

    /// Store under a different snapshot name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RiskResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_snapshot.sql"))?;
        Ok(())
    }

    fn read(&self) -> RiskResult<Option<Vec<u8>>> {
        let bytes = self
            .conn
            .query_row(
                "SELECT state_json FROM snapshot WHERE name = ?1",
                params![self.name],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(bytes)
    }
}

impl SnapshotStorage for SqliteStorage {
    fn load(&self) -> Option<Vec<u8>> {
        match self.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("snapshot '{}': read failed: {e}", self.name);
                None
            }
        }
    }

    fn save(&self, bytes: &[u8]) -> RiskResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (name, state_json, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET state_json = excluded.state_json,
                                             saved_at   = excluded.saved_at",
            params![self.name, bytes, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self) -> RiskResult<()> {
        self.conn
            .execute("DELETE FROM snapshot WHERE name = ?1", params![self.name])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_counts_writes() {
        let storage = MemoryStorage::new();
        assert!(storage.load().is_none());
        storage.save(b"[]").unwrap();
        assert_eq!(storage.load().as_deref(), Some(&b"[]"[..]));
        storage.remove().unwrap();
        assert!(storage.load().is_none());
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn sqlite_storage_overwrites_and_removes() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.migrate().unwrap();
        assert!(storage.load().is_none());

        storage.save(b"[1]").unwrap();
        storage.save(b"[2]").unwrap();
        assert_eq!(storage.load().as_deref(), Some(&b"[2]"[..]));

        storage.remove().unwrap();
        storage.remove().unwrap();
        assert!(storage.load().is_none());
    }

    #[test]
    fn sqlite_storage_without_schema_loads_nothing() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.load().is_none());
        assert!(storage.save(b"[]").is_err());
    }

    #[test]
    fn snapshot_names_are_independent() {
        let a = SqliteStorage::in_memory().unwrap();
        a.migrate().unwrap();
        a.save(b"[\"a\"]").unwrap();
        let b = a.with_name("other");
        assert!(b.load().is_none());
    }
}
