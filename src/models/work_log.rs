use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// One user's activity record for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

impl WorkLog {
    pub fn total(&self) -> u32 {
        self.tasks.len() as u32
    }

    pub fn completed(&self) -> u32 {
        self.tasks.iter().filter(|t| t.is_finished()).count() as u32
    }

    /// A day extends a streak only if at least one task is Finished.
    pub fn has_completed_tasks(&self) -> bool {
        self.tasks.iter().any(|t| t.is_finished())
    }
}
