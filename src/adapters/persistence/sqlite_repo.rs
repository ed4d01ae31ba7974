//! SQLite-backed session store via libsql. Implements SessionStorePort.
//!
//! Single `sessions` table in data/sessions.db. Every operation opens its own connection,
//! which is released when it goes out of scope on both success and error paths.

use crate::domain::{DomainError, Session, SessionOverview};
use crate::ports::SessionStorePort;
use libsql::{Connection, Database, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    transcript TEXT NOT NULL,
    summary TEXT NOT NULL
)"#;

/// Format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn repo_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Repo(e.to_string())
}

/// SQLite repository. One database file (sessions.db) in the given base directory.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

impl SqliteRepo {
    /// Connect to (or create) the SQLite database and ensure the schema exists.
    /// Call this once at startup; the returned repo is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(repo_err)?;
        let db_path = base.join("sessions.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(repo_err)?;
        let conn = db.connect().map_err(repo_err)?;

        // PRAGMA returns a row, so query and drain it; execute fails on returned rows.
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Repo(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(repo_err)?.is_some() {}

        conn.execute(SESSIONS_TABLE, ()).await.map_err(repo_err)?;

        info!(path = %db_path.display(), "SQLite session store ready");

        Ok(Self { db, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<Connection, DomainError> {
        self.db.connect().map_err(repo_err)
    }
}

#[async_trait::async_trait]
impl SessionStorePort for SqliteRepo {
    async fn create(&self, transcript: &str, summary: &str) -> Result<i64, DomainError> {
        let date = chrono::Local::now().format(DATE_FORMAT).to_string();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (date, transcript, summary) VALUES (?1, ?2, ?3)",
            params![date.as_str(), transcript, summary],
        )
        .await
        .map_err(repo_err)?;
        let id = conn.last_insert_rowid();
        info!(session_id = id, date = %date, "session saved");
        Ok(id)
    }

    async fn list(&self, limit: u32) -> Result<Vec<SessionOverview>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT id, date, summary FROM sessions ORDER BY id DESC LIMIT ?1",
                params![limit as i64],
            )
            .await
            .map_err(repo_err)?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await.map_err(repo_err)? {
            sessions.push(SessionOverview {
                id: row.get(0).map_err(repo_err)?,
                date: row.get(1).map_err(repo_err)?,
                summary: row.get(2).map_err(repo_err)?,
            });
        }
        debug!(count = sessions.len(), limit, "listed sessions");
        Ok(sessions)
    }

    async fn get(&self, id: i64) -> Result<Session, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT id, date, transcript, summary FROM sessions WHERE id = ?1",
                params![id],
            )
            .await
            .map_err(repo_err)?;
        match rows.next().await.map_err(repo_err)? {
            Some(row) => Ok(Session {
                id: row.get(0).map_err(repo_err)?,
                date: row.get(1).map_err(repo_err)?,
                transcript: row.get(2).map_err(repo_err)?,
                summary: row.get(3).map_err(repo_err)?,
            }),
            None => Err(DomainError::NotFound(id)),
        }
    }

    async fn update_summary(&self, id: i64, summary: &str) -> Result<(), DomainError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE sessions SET summary = ?1 WHERE id = ?2",
                params![summary, id],
            )
            .await
            .map_err(repo_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(id));
        }
        info!(session_id = id, summary_len = summary.len(), "session summary updated");
        Ok(())
    }
}
