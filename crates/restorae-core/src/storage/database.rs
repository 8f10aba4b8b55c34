//! SQLite-based session storage.
//!
//! Provides persistent storage for:
//! - Completed session records and statistics (daily and all-time)
//! - Key-value store used by the CLI to carry the serialized controller
//!   between invocations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::DatabaseError;

/// A completed guided session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub sequence_id: String,
    pub title: String,
    /// Where the sequence came from: "preset" or "ritual".
    pub source: String,
    pub planned_secs: u64,
    pub actual_secs: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_secs: u64,
    pub today_sessions: u64,
    pub today_secs: u64,
}

/// SQLite database for completed sessions and CLI state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/restorae/restorae.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::DataDirUnavailable(e.to_string()))?
            .join("restorae.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    sequence_id  TEXT NOT NULL,
                    title        TEXT NOT NULL DEFAULT '',
                    source       TEXT NOT NULL,
                    planned_secs INTEGER NOT NULL,
                    actual_secs  INTEGER NOT NULL,
                    started_at   TEXT NOT NULL,
                    completed_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn record_session(
        &self,
        sequence_id: &str,
        title: &str,
        source: &str,
        planned_secs: u64,
        actual_secs: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (sequence_id, title, source, planned_secs, actual_secs, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                sequence_id,
                title,
                source,
                planned_secs,
                actual_secs,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recently completed sessions, newest first.
    pub fn recent_sessions(&self, limit: u32) -> Result<Vec<SessionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence_id, title, source, planned_secs, actual_secs, started_at, completed_at
             FROM sessions ORDER BY completed_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u64>(4)?,
                row.get::<_, u64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, sequence_id, title, source, planned_secs, actual_secs, started, completed) =
                row?;
            records.push(SessionRecord {
                id,
                sequence_id,
                title,
                source,
                planned_secs,
                actual_secs,
                started_at: parse_timestamp(&started)?,
                completed_at: parse_timestamp(&completed)?,
            });
        }
        Ok(records)
    }

    /// Session counts and time totals, all-time and since UTC midnight.
    pub fn stats(&self) -> Result<Stats, DatabaseError> {
        let midnight = format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"));
        let (today_sessions, today_secs) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(actual_secs), 0) FROM sessions WHERE completed_at >= ?1",
            params![midnight],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        let (total_sessions, total_secs) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(actual_secs), 0) FROM sessions",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        Ok(Stats {
            total_sessions,
            total_secs,
            today_sessions,
            today_secs,
        })
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read_back() {
        let db = Database::open_memory().unwrap();
        let started = Utc::now();
        let id = db
            .record_session("panic-attack", "Panic Attack", "preset", 125, 118, started, Utc::now())
            .unwrap();
        assert!(id > 0);

        let records = db.recent_sessions(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence_id, "panic-attack");
        assert_eq!(records[0].actual_secs, 118);
    }

    #[test]
    fn stats_count_today_and_all_time() {
        let db = Database::open_memory().unwrap();
        db.record_session("a", "A", "preset", 60, 60, Utc::now(), Utc::now())
            .unwrap();
        db.record_session("b", "B", "ritual", 120, 90, Utc::now(), Utc::now())
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_secs, 150);
        assert_eq!(stats.today_sessions, 2);
        assert_eq!(stats.today_secs, 150);
    }

    #[test]
    fn kv_roundtrip_and_delete() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("controller").unwrap().is_none());
        db.kv_set("controller", "{}").unwrap();
        db.kv_set("controller", "{\"state\":\"running\"}").unwrap();
        assert_eq!(
            db.kv_get("controller").unwrap().as_deref(),
            Some("{\"state\":\"running\"}")
        );
        db.kv_delete("controller").unwrap();
        assert!(db.kv_get("controller").unwrap().is_none());
    }
}
