use anyhow::Result;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::models::{Task, TaskStatus, WorkLog};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── Work logs ───────────────────────────────────────────────────────────────

pub struct WorkLogRepo;

impl WorkLogRepo {
    /// Return the id of the (user, date) log, creating it if needed.
    pub fn ensure(conn: &Connection, user_id: &str, date: NaiveDate) -> Result<i64> {
        let date_str = date_key(date);
        conn.execute(
            "INSERT OR IGNORE INTO work_logs (user_id, date) VALUES (?1, ?2)",
            params![user_id, date_str],
        )?;
        let id = conn.query_row(
            "SELECT id FROM work_logs WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_str],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn find_by_date(
        conn: &Connection,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<WorkLog>> {
        let date_str = date_key(date);
        debug!("work log lookup user={} date={}", user_id, date_str);

        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM work_logs WHERE user_id = ?1 AND date = ?2",
                params![user_id, date_str],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            None => Ok(None),
            Some(id) => Ok(Some(WorkLog {
                id,
                user_id: user_id.to_string(),
                date,
                tasks: TaskRepo::list_for_log(conn, id)?,
            })),
        }
    }

    /// All logs on or after `since`, newest first, each with its tasks.
    pub fn list_since(conn: &Connection, user_id: &str, since: NaiveDate) -> Result<Vec<WorkLog>> {
        debug!("work log range user={} since={}", user_id, date_key(since));

        let mut stmt = conn.prepare(
            "SELECT w.id, w.date, t.id, t.title, t.status, t.created_at
             FROM work_logs w
             LEFT JOIN tasks t ON t.work_log_id = w.id
             WHERE w.user_id = ?1 AND w.date >= ?2
             ORDER BY w.date DESC, t.id",
        )?;

        let rows = stmt.query_map(params![user_id, date_key(since)], |row| {
            let date_str: String = row.get(1)?;
            Ok((
                row.get::<_, i64>(0)?,
                parse_date_column(1, &date_str)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut result: Vec<WorkLog> = Vec::new();
        for r in rows {
            let (log_id, date, task_id, title, status, created_at) = r?;
            if result.last().map(|l| l.id) != Some(log_id) {
                result.push(WorkLog {
                    id: log_id,
                    user_id: user_id.to_string(),
                    date,
                    tasks: Vec::new(),
                });
            }
            if let (Some(task_id), Some(log)) = (task_id, result.last_mut()) {
                log.tasks.push(Task {
                    id: task_id,
                    work_log_id: log_id,
                    title: title.unwrap_or_default(),
                    status: TaskStatus::from_stored(status.as_deref().unwrap_or_default()),
                    created_at,
                });
            }
        }
        Ok(result)
    }
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

pub struct TaskRepo;

impl TaskRepo {
    pub fn list_for_log(conn: &Connection, work_log_id: i64) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(
            "SELECT id, work_log_id, title, status, created_at
             FROM tasks WHERE work_log_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![work_log_id], |row| {
            Ok(Task {
                id: row.get(0)?,
                work_log_id: row.get(1)?,
                title: row.get(2)?,
                status: TaskStatus::from_stored(&row.get::<_, String>(3)?),
                created_at: row.get(4)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    /// Add a task to the user's log for `date`, creating the log on demand.
    pub fn add(conn: &Connection, user_id: &str, date: NaiveDate, title: &str) -> Result<Task> {
        let work_log_id = WorkLogRepo::ensure(conn, user_id, date)?;
        conn.execute(
            "INSERT INTO tasks (work_log_id, title, status) VALUES (?1, ?2, ?3)",
            params![work_log_id, title, TaskStatus::NotStarted.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        debug!("task {} added to log {} ({})", id, work_log_id, date_key(date));

        Ok(Task {
            id,
            work_log_id,
            title: title.to_string(),
            status: TaskStatus::NotStarted,
            created_at: None,
        })
    }

    /// Look up a task, scoped to the user who owns its log.
    pub fn find(
        conn: &Connection,
        user_id: &str,
        task_id: i64,
    ) -> Result<Option<(Task, NaiveDate)>> {
        conn.query_row(
            "SELECT t.id, t.work_log_id, t.title, t.status, t.created_at, w.date
             FROM tasks t JOIN work_logs w ON w.id = t.work_log_id
             WHERE t.id = ?1 AND w.user_id = ?2",
            params![task_id, user_id],
            |row| {
                let date_str: String = row.get(5)?;
                Ok((
                    Task {
                        id: row.get(0)?,
                        work_log_id: row.get(1)?,
                        title: row.get(2)?,
                        status: TaskStatus::from_stored(&row.get::<_, String>(3)?),
                        created_at: row.get(4)?,
                    },
                    parse_date_column(5, &date_str)?,
                ))
            },
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    /// Returns false when no task with that id belongs to the user.
    pub fn set_status(
        conn: &Connection,
        user_id: &str,
        task_id: i64,
        status: &TaskStatus,
    ) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE tasks SET status = ?1
             WHERE id = ?2
               AND work_log_id IN (SELECT id FROM work_logs WHERE user_id = ?3)",
            params![status.as_str(), task_id, user_id],
        )?;
        Ok(changed > 0)
    }

    pub fn remove(conn: &Connection, user_id: &str, task_id: i64) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM tasks
             WHERE id = ?1
               AND work_log_id IN (SELECT id FROM work_logs WHERE user_id = ?2)",
            params![task_id, user_id],
        )?;
        Ok(changed > 0)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}
