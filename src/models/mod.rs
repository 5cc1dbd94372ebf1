pub mod stats;
pub mod task;
pub mod work_log;

pub use stats::{DailyProgress, Streak, UserStats};
pub use task::{Task, TaskStatus};
pub use work_log::WorkLog;
