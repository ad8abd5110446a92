// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for queued uploads.
//!
//! The [`UploadStore`] is the sole source of truth for queue contents. Entries
//! are written before any network transmission, so queued work survives a
//! process restart, including one that happens mid-upload.
//!
//! A store whose database could not be opened is *unavailable*: reads return
//! nothing and writes are no-ops, so callers see an empty queue instead of an
//! error. Only [`UploadStore::enqueue`] reports [`Error::Unavailable`], since
//! silently dropping new work would lose the caller's files.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::upload::{FileType, NewUpload, QueuedUpload, UploadStatus, UploadSummary};

/// SQL schema for the upload queue database.
///
/// `seq` preserves insertion order, which breaks `created_at` ties.
/// `created_at` is stored as milliseconds since the Unix epoch.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS uploads (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    file_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    content_type TEXT NOT NULL,
    payload BLOB NOT NULL,
    status TEXT NOT NULL DEFAULT 'queued',
    retry_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_uploads_status ON uploads(status);
CREATE INDEX IF NOT EXISTS idx_uploads_created ON uploads(created_at);
"#;

const UPLOAD_COLUMNS: &str =
    "id, file_name, file_type, content_type, payload, status, retry_count, created_at, error_message";

const SUMMARY_COLUMNS: &str = "id, file_name, file_type, content_type, length(payload), status, \
     retry_count, created_at, error_message";

/// Age limits applied by [`UploadStore::cleanup_old`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    /// Completed entries older than this are removed.
    pub completed_ttl: Duration,
    /// Entries of any status older than this are removed.
    pub stale_ttl: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Retention {
            completed_ttl: Duration::from_secs(60 * 60),
            stale_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse a millisecond timestamp from the database.
fn parse_millis(value: i64, column: &str) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(Error::CorruptedData(format!(
                "invalid timestamp '{value}' in column '{column}'"
            ))),
        )
    })
}

fn row_to_upload(row: &Row<'_>) -> rusqlite::Result<QueuedUpload> {
    let file_type: String = row.get(2)?;
    let status: String = row.get(5)?;
    let created_at: i64 = row.get(7)?;
    Ok(QueuedUpload {
        id: row.get(0)?,
        file_name: row.get(1)?,
        file_type: parse_db::<FileType>(&file_type, "file_type")?,
        content_type: row.get(3)?,
        payload: row.get(4)?,
        status: parse_db::<UploadStatus>(&status, "status")?,
        retry_count: row.get(6)?,
        created_at: parse_millis(created_at, "created_at")?,
        error_message: row.get(8)?,
    })
}

fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<UploadSummary> {
    let file_type: String = row.get(2)?;
    let status: String = row.get(5)?;
    let created_at: i64 = row.get(7)?;
    let size: i64 = row.get(4)?;
    Ok(UploadSummary {
        id: row.get(0)?,
        file_name: row.get(1)?,
        file_type: parse_db::<FileType>(&file_type, "file_type")?,
        content_type: row.get(3)?,
        size: u64::try_from(size).unwrap_or(0),
        status: parse_db::<UploadStatus>(&status, "status")?,
        retry_count: row.get(6)?,
        created_at: parse_millis(created_at, "created_at")?,
        error_message: row.get(8)?,
    })
}

/// Run schema creation on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn millis_ago(now: DateTime<Utc>, age: Duration) -> i64 {
    let age_ms = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
    now.timestamp_millis().saturating_sub(age_ms)
}

/// Durable upload queue store.
pub struct UploadStore {
    /// `None` when the backing database is unavailable.
    conn: Option<Mutex<Connection>>,
    clock: Arc<dyn ClockSource>,
    retention: Retention,
}

impl UploadStore {
    /// Open the queue database at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        run_migrations(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open the store at `path`, falling back to an unavailable store on failure.
    pub fn open_or_unavailable(path: &Path) -> Self {
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "upload queue unavailable");
                Self::unavailable()
            }
        }
    }

    /// A store with no backing database.
    pub fn unavailable() -> Self {
        UploadStore {
            conn: None,
            clock: Arc::new(SystemClock),
            retention: Retention::default(),
        }
    }

    fn from_connection(conn: Connection) -> Self {
        UploadStore {
            conn: Some(Mutex::new(conn)),
            clock: Arc::new(SystemClock),
            retention: Retention::default(),
        }
    }

    /// Replaces the clock used for `created_at` and age checks.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the age limits used by the cleanup sweep.
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Returns true if the backing database is open.
    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    /// Run `f` against the connection, or return `fallback` if unavailable.
    fn with_conn<T>(
        &self,
        fallback: T,
        f: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        match &self.conn {
            Some(conn) => {
                let mut guard = conn.lock().unwrap_or_else(|e| e.into_inner());
                f(&mut guard)
            }
            None => Ok(fallback),
        }
    }

    /// Persist one entry per file, all in a single transaction.
    ///
    /// Every entry starts `queued` with `retry_count = 0` and a fresh id.
    pub fn enqueue(&self, files: Vec<NewUpload>, file_type: FileType) -> Result<Vec<QueuedUpload>> {
        let Some(conn) = &self.conn else {
            return Err(Error::Unavailable("queue database is not open".to_string()));
        };
        let mut conn = conn.lock().unwrap_or_else(|e| e.into_inner());

        let now = self.clock.now();
        let uploads: Vec<QueuedUpload> = files
            .into_iter()
            .map(|file| QueuedUpload {
                id: uuid::Uuid::new_v4().to_string(),
                file_name: file.file_name,
                file_type,
                content_type: file.content_type,
                payload: file.payload,
                status: UploadStatus::Queued,
                retry_count: 0,
                created_at: now,
                error_message: None,
            })
            .collect();

        let tx = conn.transaction()?;
        for upload in &uploads {
            tx.execute(
                "INSERT INTO uploads (id, file_name, file_type, content_type, payload,
                 status, retry_count, created_at, error_message)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    upload.id,
                    upload.file_name,
                    upload.file_type.as_str(),
                    upload.content_type,
                    upload.payload,
                    upload.status.as_str(),
                    upload.retry_count,
                    upload.created_at.timestamp_millis(),
                    upload.error_message,
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!(count = uploads.len(), file_type = %file_type, "enqueued uploads");
        Ok(uploads)
    }

    /// Every persisted entry regardless of status, in insertion order.
    pub fn get_all(&self) -> Result<Vec<QueuedUpload>> {
        self.with_conn(Vec::new(), |conn| {
            let sql = format!("SELECT {UPLOAD_COLUMNS} FROM uploads ORDER BY seq");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_upload)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    /// Every entry without payloads, in insertion order.
    pub fn get_summaries(&self) -> Result<Vec<UploadSummary>> {
        self.with_conn(Vec::new(), |conn| {
            let sql = format!("SELECT {SUMMARY_COLUMNS} FROM uploads ORDER BY seq");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_summary)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    /// Entries still awaiting work: `queued` or `uploading`.
    ///
    /// `uploading` entries are included so work interrupted by a restart resumes.
    pub fn get_pending(&self) -> Result<Vec<QueuedUpload>> {
        self.with_conn(Vec::new(), |conn| {
            let sql = format!(
                "SELECT {UPLOAD_COLUMNS} FROM uploads
                 WHERE status IN ('queued', 'uploading') ORDER BY seq"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_upload)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    /// Look up a single entry without its payload.
    pub fn get(&self, id: &str) -> Result<Option<UploadSummary>> {
        self.with_conn(None, |conn| {
            let sql = format!("SELECT {SUMMARY_COLUMNS} FROM uploads WHERE id = ?1");
            Ok(conn.query_row(&sql, params![id], row_to_summary).optional()?)
        })
    }

    /// Set an entry's status.
    ///
    /// Entering `uploading` counts as an attempt and increments `retry_count`.
    /// `error_message` is kept only for `failed`; other statuses clear it.
    /// An unknown id is a no-op.
    pub fn update_status(
        &self,
        id: &str,
        status: UploadStatus,
        error_message: Option<&str>,
    ) -> Result<()> {
        self.with_conn((), |conn| {
            let error_message = match status {
                UploadStatus::Failed => error_message,
                _ => None,
            };
            conn.execute(
                "UPDATE uploads SET
                     retry_count = retry_count
                         + CASE WHEN ?1 = 'uploading' AND status != 'uploading' THEN 1 ELSE 0 END,
                     status = ?1,
                     error_message = CASE WHEN ?1 = 'failed' THEN COALESCE(?2, error_message) END
                 WHERE id = ?3",
                params![status.as_str(), error_message, id],
            )?;
            Ok(())
        })
    }

    /// Undo an interrupted attempt: back to `queued` with `retry_count` set
    /// to its value before the attempt started.
    ///
    /// Entries that are no longer `uploading` are left alone.
    pub fn revert_attempt(&self, id: &str, retry_count: u32) -> Result<()> {
        self.with_conn((), |conn| {
            conn.execute(
                "UPDATE uploads SET status = 'queued', error_message = NULL,
                     retry_count = MIN(retry_count, ?2)
                 WHERE id = ?1 AND status = 'uploading'",
                params![id, retry_count],
            )?;
            Ok(())
        })
    }

    /// Delete an entry permanently. Returns false if it did not exist.
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.with_conn(false, |conn| {
            let changed = conn.execute("DELETE FROM uploads WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }

    /// Delete every `completed` entry. Returns the number removed.
    pub fn remove_completed(&self) -> Result<usize> {
        self.with_conn(0, |conn| {
            Ok(conn.execute("DELETE FROM uploads WHERE status = 'completed'", [])?)
        })
    }

    /// Age-based eviction run at the start of every processing pass.
    ///
    /// Removes `completed` entries older than [`Retention::completed_ttl`] and
    /// any entry older than [`Retention::stale_ttl`]. Returns the number removed.
    pub fn cleanup_old(&self) -> Result<usize> {
        let now = self.clock.now();
        let completed_cutoff = millis_ago(now, self.retention.completed_ttl);
        let stale_cutoff = millis_ago(now, self.retention.stale_ttl);
        self.with_conn(0, |conn| {
            Ok(conn.execute(
                "DELETE FROM uploads
                 WHERE (status = 'completed' AND created_at < ?1) OR created_at < ?2",
                params![completed_cutoff, stale_cutoff],
            )?)
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
