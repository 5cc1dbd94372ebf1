use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::repository::WorkLogRepo;
use crate::models::WorkLog;

/// The two reads the stats calculator needs from a datastore.
pub trait WorkLogSource {
    /// The user's log for exactly `date`, with its tasks.
    fn log_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<WorkLog>>;

    /// Every log with `date >= since`, newest first.
    fn logs_since(&self, user_id: &str, since: NaiveDate) -> Result<Vec<WorkLog>>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl WorkLogSource for SqliteStore<'_> {
    fn log_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<WorkLog>> {
        WorkLogRepo::find_by_date(self.conn, user_id, date)
    }

    fn logs_since(&self, user_id: &str, since: NaiveDate) -> Result<Vec<WorkLog>> {
        WorkLogRepo::list_since(self.conn, user_id, since)
    }
}
