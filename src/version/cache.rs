use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::version::error::CacheError;

/// Key-value storage with per-entry expiry
#[cfg_attr(test, automock)]
pub trait CacheStore: Send + Sync + 'static {
    /// Stored value for `key`, `None` when absent or expired
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Entry counts of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub expired: usize,
}

pub struct Cache {
    conn: Mutex<Connection>,
}

impl Cache {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing cache database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let cache = Self {
            conn: Mutex::new(conn),
        };

        cache.create_schema()?;
        info!("Cache initialized successfully");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_expires_at ON entries(expires_at)",
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Delete expired entries, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            "DELETE FROM entries WHERE expires_at <= ?1",
            [Self::current_timestamp_ms()],
        )?;

        info!("Purged {} expired cache entries", removed);
        Ok(removed)
    }

    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let conn = self.lock_conn()?;
        let (entries, expired): (i64, i64) = conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(CASE WHEN expires_at <= ?1 THEN 1 ELSE 0 END), 0)
            FROM entries
            "#,
            [Self::current_timestamp_ms()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(CacheStats {
            entries: usize::try_from(entries).unwrap_or_default(),
            expired: usize::try_from(expired).unwrap_or_default(),
        })
    }

    /// Round-trip a trivial query through the connection
    pub fn check_health(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

impl CacheStore for Cache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1 AND expires_at > ?2",
                (key, Self::current_timestamp_ms()),
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Self::current_timestamp_ms();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_ms);

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO entries (key, value, expires_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at
            "#,
            (key, value, expires_at, now),
        )?;

        debug!("Stored cache entry {} (ttl {:?})", key, ttl);
        Ok(())
    }
}
