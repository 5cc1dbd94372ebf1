use crate::models::UserStats;

/// Message worth an achievement popup when stats moved from `before` to
/// `after`, if any.
pub fn celebration(before: &UserStats, after: &UserStats) -> Option<String> {
    let done = &after.today_progress;
    if done.total > 0 && done.percentage == 100 && before.today_progress.percentage < 100 {
        return Some(format!("All {} tasks finished!", done.total));
    }
    let streak = &after.streak;
    if streak.current > before.streak.current && streak.current > 1 {
        return Some(format!("{} days in a row. Keep it going!", streak.current));
    }
    None
}
