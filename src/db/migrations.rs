use anyhow::Result;
use log::{debug, info};
use rusqlite::Connection;

use crate::db::repository::MetaRepo;

pub const SCHEMA_VERSION: &str = "1";

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS work_logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL,
            date        TEXT NOT NULL,
            created_at  TEXT DEFAULT (datetime('now')),
            UNIQUE(user_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_work_logs_user_date
            ON work_logs (user_id, date DESC);

        CREATE TABLE IF NOT EXISTS tasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            work_log_id  INTEGER NOT NULL REFERENCES work_logs(id) ON DELETE CASCADE,
            title        TEXT NOT NULL,
            status       TEXT NOT NULL DEFAULT 'Not Started',
            created_at   TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_work_log
            ON tasks (work_log_id);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    let previous = MetaRepo::get(conn, "schema_version")?;
    if previous.as_deref() != Some(SCHEMA_VERSION) {
        info!(
            "schema version {} -> {}",
            previous.as_deref().unwrap_or("none"),
            SCHEMA_VERSION
        );
        MetaRepo::set(conn, "schema_version", SCHEMA_VERSION)?;
    }
    debug!("migrations applied (schema v{})", SCHEMA_VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let version = MetaRepo::get(&conn, "schema_version").unwrap();
        assert_eq!(version.as_deref(), Some(SCHEMA_VERSION));
    }
}
