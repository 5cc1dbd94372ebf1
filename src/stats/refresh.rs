use log::debug;

use crate::models::UserStats;
use crate::stats::StatsError;

/// Identifies one stats request; only the newest ticket's result is adopted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-write-wins holder for the stats shown by a view.
#[derive(Debug, Default)]
pub struct StatsRefresh {
    generation: u64,
    stats: UserStats,
    loading: bool,
    error: Option<String>,
}

impl StatsRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any still in flight.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    /// Record a finished request. Returns false if a newer request has
    /// started since, in which case the result is dropped. A failure keeps
    /// the previous stats on screen.
    pub fn finish(&mut self, ticket: Ticket, result: Result<UserStats, StatsError>) -> bool {
        if ticket.0 != self.generation {
            debug!("dropping stale stats result (gen {} < {})", ticket.0, self.generation);
            return false;
        }
        self.loading = false;
        match result {
            Ok(stats) => {
                self.stats = stats;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyProgress, Streak};

    fn stats(current: u32) -> UserStats {
        UserStats {
            today_progress: DailyProgress::new(1, 2),
            streak: Streak {
                current,
                longest: current,
                this_month: current,
            },
        }
    }

    #[test]
    fn newest_request_wins() {
        let mut refresh = StatsRefresh::new();
        let old = refresh.begin();
        let new = refresh.begin();

        assert!(refresh.finish(new, Ok(stats(2))));
        assert!(!refresh.finish(old, Ok(stats(9))));
        assert_eq!(refresh.stats().streak.current, 2);
        assert!(!refresh.is_loading());
    }

    #[test]
    fn stale_result_does_not_clear_loading() {
        let mut refresh = StatsRefresh::new();
        let old = refresh.begin();
        let _new = refresh.begin();
        refresh.finish(old, Ok(stats(1)));
        assert!(refresh.is_loading());
        assert_eq!(*refresh.stats(), UserStats::default());
    }

    #[test]
    fn failure_keeps_previous_stats() {
        let mut refresh = StatsRefresh::new();
        let t = refresh.begin();
        refresh.finish(t, Ok(stats(4)));
        let t = refresh.begin();
        refresh.finish(t, Err(StatsError::EmptyUserId));
        assert_eq!(refresh.stats().streak.current, 4);
        assert_eq!(refresh.error(), Some("user id must not be empty"));

        let t = refresh.begin();
        refresh.finish(t, Ok(stats(5)));
        assert!(refresh.error().is_none());
    }
}
