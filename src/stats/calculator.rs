use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use thiserror::Error;

use crate::db::WorkLogSource;
use crate::models::{DailyProgress, Streak, UserStats, WorkLog};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("datastore query failed: {0:#}")]
    Store(anyhow::Error),
}

/// Derives [`UserStats`] from a user's work logs. Holds no state of its own;
/// every call re-reads the source.
pub struct StatsCalculator<'a, S: WorkLogSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: WorkLogSource + ?Sized> StatsCalculator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Stats for `reference` (default: today), with the streak window taken
    /// from the current month.
    pub fn compute(
        &self,
        user_id: &str,
        reference: Option<NaiveDate>,
    ) -> Result<UserStats, StatsError> {
        self.compute_at(user_id, reference, Local::now().date_naive())
    }

    /// Same as [`compute`](Self::compute) with an explicit "today".
    pub fn compute_at(
        &self,
        user_id: &str,
        reference: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<UserStats, StatsError> {
        if user_id.trim().is_empty() {
            return Err(StatsError::EmptyUserId);
        }
        let target = reference.unwrap_or(today);

        let day_log = self
            .source
            .log_for_date(user_id, target)
            .map_err(StatsError::Store)?;
        let today_progress = daily_progress(day_log.as_ref());

        // The window follows the wall clock, not the reference date.
        let logs = self
            .source
            .logs_since(user_id, first_day_of_month(today))
            .map_err(StatsError::Store)?;
        let streak = aggregate_streak(&logs, today);

        debug!(
            "stats user={} target={} progress={}/{} ({}%) streak={}/{}/{} over {} logs",
            user_id,
            target,
            today_progress.completed,
            today_progress.total,
            today_progress.percentage,
            streak.current,
            streak.longest,
            streak.this_month,
            logs.len()
        );

        Ok(UserStats {
            today_progress,
            streak,
        })
    }
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Progress for one day's log; a missing log is zero activity.
pub fn daily_progress(log: Option<&WorkLog>) -> DailyProgress {
    match log {
        Some(log) => DailyProgress::new(log.completed(), log.total()),
        None => DailyProgress::default(),
    }
}

/// Single pass over the logs, newest first.
///
/// `current` tracks the running streak only while the leading run from the
/// newest log is unbroken; the first gap or idle day freezes it. `longest` is
/// the best running value seen anywhere in the pass. Adjacency means exactly
/// one calendar day between neighbouring entries.
pub fn aggregate_streak(logs: &[WorkLog], today: NaiveDate) -> Streak {
    let mut sorted: Vec<&WorkLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut streak = Streak::default();
    let mut running = 0u32;
    let mut leading = true;

    for (index, log) in sorted.iter().enumerate() {
        let extended = if log.has_completed_tasks() {
            let adjacent = index > 0 && (sorted[index - 1].date - log.date).num_days() == 1;
            running = if index == 0 || adjacent { running + 1 } else { 1 };
            index == 0 || adjacent
        } else {
            running = 0;
            false
        };

        if leading && extended {
            streak.current = running;
        } else {
            leading = false;
        }
        streak.longest = streak.longest.max(running);
        if log.date.year() == today.year() && log.date.month() == today.month() {
            streak.this_month += 1;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};
    use anyhow::anyhow;

    struct MemorySource {
        logs: Vec<WorkLog>,
    }

    impl WorkLogSource for MemorySource {
        fn log_for_date(&self, user_id: &str, date: NaiveDate) -> anyhow::Result<Option<WorkLog>> {
            Ok(self
                .logs
                .iter()
                .find(|l| l.user_id == user_id && l.date == date)
                .cloned())
        }

        fn logs_since(&self, user_id: &str, since: NaiveDate) -> anyhow::Result<Vec<WorkLog>> {
            let mut logs: Vec<WorkLog> = self
                .logs
                .iter()
                .filter(|l| l.user_id == user_id && l.date >= since)
                .cloned()
                .collect();
            logs.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(logs)
        }
    }

    struct BrokenSource;

    impl WorkLogSource for BrokenSource {
        fn log_for_date(&self, _: &str, _: NaiveDate) -> anyhow::Result<Option<WorkLog>> {
            Err(anyhow!("disk I/O error"))
        }

        fn logs_since(&self, _: &str, _: NaiveDate) -> anyhow::Result<Vec<WorkLog>> {
            Err(anyhow!("disk I/O error"))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(date: NaiveDate, statuses: &[TaskStatus]) -> WorkLog {
        WorkLog {
            id: date.ordinal() as i64,
            user_id: "ana".to_string(),
            date,
            tasks: statuses
                .iter()
                .enumerate()
                .map(|(i, status)| Task {
                    id: i as i64,
                    work_log_id: date.ordinal() as i64,
                    title: format!("task {i}"),
                    status: status.clone(),
                    created_at: None,
                })
                .collect(),
        }
    }

    fn finished(date: NaiveDate) -> WorkLog {
        log(date, &[TaskStatus::Finished])
    }

    fn idle(date: NaiveDate) -> WorkLog {
        log(date, &[TaskStatus::NotStarted, TaskStatus::InProgress])
    }

    #[test]
    fn three_consecutive_finished_days() {
        let source = MemorySource {
            logs: vec![
                finished(date(2024, 3, 1)),
                finished(date(2024, 3, 2)),
                finished(date(2024, 3, 3)),
            ],
        };
        let today = date(2024, 3, 3);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", Some(today), today)
            .unwrap();
        assert_eq!(stats.streak.current, 3);
        assert_eq!(stats.streak.longest, 3);
        assert_eq!(stats.streak.this_month, 3);
    }

    #[test]
    fn idle_day_breaks_the_streak() {
        let source = MemorySource {
            logs: vec![
                finished(date(2024, 3, 1)),
                idle(date(2024, 3, 2)),
                finished(date(2024, 3, 3)),
            ],
        };
        let today = date(2024, 3, 3);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", Some(today), today)
            .unwrap();
        assert_eq!(stats.streak.current, 1);
        assert_eq!(stats.streak.longest, 1);
        assert_eq!(stats.streak.this_month, 3);
    }

    #[test]
    fn three_of_four_finished_is_75_percent() {
        let day = date(2024, 3, 10);
        let source = MemorySource {
            logs: vec![log(
                day,
                &[
                    TaskStatus::Finished,
                    TaskStatus::Finished,
                    TaskStatus::InProgress,
                    TaskStatus::Finished,
                ],
            )],
        };
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", Some(day), day)
            .unwrap();
        assert_eq!(stats.today_progress, DailyProgress { completed: 3, total: 4, percentage: 75 });
    }

    #[test]
    fn missing_log_is_zero_progress() {
        let source = MemorySource { logs: vec![] };
        let day = date(2024, 3, 10);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", Some(day), day)
            .unwrap();
        assert_eq!(stats, UserStats::default());
    }

    #[test]
    fn empty_log_is_zero_percent_and_breaks_streak() {
        let source = MemorySource {
            logs: vec![finished(date(2024, 3, 1)), log(date(2024, 3, 2), &[])],
        };
        let today = date(2024, 3, 2);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", None, today)
            .unwrap();
        assert_eq!(stats.today_progress.percentage, 0);
        assert_eq!(stats.streak.current, 0);
        assert_eq!(stats.streak.longest, 1);
        assert_eq!(stats.streak.this_month, 2);
    }

    #[test]
    fn current_is_zero_when_newest_day_is_idle() {
        let today = date(2024, 3, 20);
        let logs = vec![
            idle(date(2024, 3, 20)),
            finished(date(2024, 3, 19)),
            finished(date(2024, 3, 18)),
            finished(date(2024, 3, 17)),
        ];
        let streak = aggregate_streak(&logs, today);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn gap_restarts_running_count() {
        let today = date(2024, 3, 20);
        let logs = vec![
            finished(date(2024, 3, 20)),
            finished(date(2024, 3, 19)),
            finished(date(2024, 3, 15)),
            finished(date(2024, 3, 14)),
            finished(date(2024, 3, 13)),
        ];
        let streak = aggregate_streak(&logs, today);
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn current_ignores_everything_after_the_newest_entry() {
        let today = date(2024, 3, 20);
        let base = vec![finished(date(2024, 3, 20)), idle(date(2024, 3, 19))];
        let mut extended = base.clone();
        extended.extend((1..=10).map(|d| finished(date(2024, 3, d))));

        let a = aggregate_streak(&base, today);
        let b = aggregate_streak(&extended, today);
        assert_eq!(a.current, b.current);
        assert!(b.longest >= b.current);
    }

    #[test]
    fn adjacency_spans_month_boundaries() {
        let today = date(2024, 3, 1);
        let logs = vec![
            finished(date(2024, 2, 28)),
            finished(date(2024, 2, 29)),
            finished(date(2024, 3, 1)),
        ];
        let streak = aggregate_streak(&logs, today);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
        assert_eq!(streak.this_month, 1);
    }

    #[test]
    fn input_order_does_not_matter() {
        let today = date(2024, 3, 5);
        let logs = vec![
            finished(date(2024, 3, 3)),
            finished(date(2024, 3, 5)),
            finished(date(2024, 3, 4)),
        ];
        assert_eq!(aggregate_streak(&logs, today).current, 3);
    }

    #[test]
    fn duplicate_dates_reset_to_one() {
        let today = date(2024, 3, 5);
        let logs = vec![finished(date(2024, 3, 5)), finished(date(2024, 3, 5))];
        let streak = aggregate_streak(&logs, today);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn this_month_requires_matching_year() {
        let today = date(2024, 3, 5);
        let logs = vec![finished(date(2024, 3, 1)), finished(date(2023, 3, 1))];
        assert_eq!(aggregate_streak(&logs, today).this_month, 1);
    }

    #[test]
    fn unknown_status_never_counts() {
        let today = date(2024, 3, 5);
        let logs = vec![log(today, &[TaskStatus::Other("Done-ish".into())])];
        let streak = aggregate_streak(&logs, today);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
        assert_eq!(streak.this_month, 1);
    }

    #[test]
    fn window_follows_today_not_reference_date() {
        let source = MemorySource {
            logs: vec![
                finished(date(2024, 2, 10)),
                finished(date(2024, 3, 1)),
                finished(date(2024, 3, 2)),
            ],
        };
        let today = date(2024, 3, 2);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", Some(date(2024, 2, 10)), today)
            .unwrap();
        assert_eq!(stats.today_progress.completed, 1);
        assert_eq!(stats.streak.current, 2);
        assert_eq!(stats.streak.this_month, 2);
    }

    #[test]
    fn other_users_logs_are_invisible() {
        let mut other = finished(date(2024, 3, 2));
        other.user_id = "bo".into();
        let source = MemorySource {
            logs: vec![other, finished(date(2024, 3, 1))],
        };
        let today = date(2024, 3, 2);
        let stats = StatsCalculator::new(&source)
            .compute_at("ana", None, today)
            .unwrap();
        assert_eq!(stats.today_progress.total, 0);
        assert_eq!(stats.streak.this_month, 1);
    }

    #[test]
    fn repeated_calls_agree() {
        let source = MemorySource {
            logs: vec![finished(date(2024, 3, 1)), idle(date(2024, 3, 2))],
        };
        let today = date(2024, 3, 2);
        let calc = StatsCalculator::new(&source);
        let first = calc.compute_at("ana", None, today).unwrap();
        let second = calc.compute_at("ana", None, today).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_user_is_rejected() {
        let source = MemorySource { logs: vec![] };
        let err = StatsCalculator::new(&source)
            .compute_at("  ", None, date(2024, 3, 2))
            .unwrap_err();
        assert!(matches!(err, StatsError::EmptyUserId));
    }

    #[test]
    fn store_failures_propagate() {
        let err = StatsCalculator::new(&BrokenSource)
            .compute_at("ana", None, date(2024, 3, 2))
            .unwrap_err();
        assert!(matches!(err, StatsError::Store(_)));
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn works_against_sqlite() {
        use crate::db::migrations::run_migrations;
        use crate::db::repository::TaskRepo;
        use crate::db::SqliteStore;
        use rusqlite::Connection;

        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        for d in 1..=3 {
            let task = TaskRepo::add(&conn, "ana", date(2024, 3, d), "ship").unwrap();
            TaskRepo::set_status(&conn, "ana", task.id, &TaskStatus::Finished).unwrap();
        }
        TaskRepo::add(&conn, "ana", date(2024, 3, 3), "follow up").unwrap();

        let store = SqliteStore::new(&conn);
        let today = date(2024, 3, 3);
        let stats = StatsCalculator::new(&store)
            .compute_at("ana", None, today)
            .unwrap();
        assert_eq!(stats.today_progress, DailyProgress { completed: 1, total: 2, percentage: 50 });
        assert_eq!(stats.streak, Streak { current: 3, longest: 3, this_month: 3 });
    }
}
