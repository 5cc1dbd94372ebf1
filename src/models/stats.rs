use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

impl DailyProgress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self {
            completed,
            total,
            percentage: round_percentage(completed, total),
        }
    }
}

/// `round(100 * completed / total)` with halves rounded up, in integer
/// arithmetic. Zero when there is nothing to complete.
pub fn round_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    ((200 * completed + total) / (2 * total)) as u32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub this_month: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub today_progress: DailyProgress,
    pub streak: Streak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_zero_percent() {
        assert_eq!(DailyProgress::new(0, 0).percentage, 0);
    }

    #[test]
    fn rounds_halves_up() {
        // 1/8 = 12.5%
        assert_eq!(round_percentage(1, 8), 13);
        // 1/3 = 33.33%
        assert_eq!(round_percentage(1, 3), 33);
        // 2/3 = 66.67%
        assert_eq!(round_percentage(2, 3), 67);
        assert_eq!(round_percentage(3, 4), 75);
    }

    #[test]
    fn percentage_stays_in_range() {
        for total in 1..=40u32 {
            for completed in 0..=total {
                let p = round_percentage(completed, total);
                assert!(p <= 100);
                let expected = (100.0 * completed as f64 / total as f64 + 0.5).floor() as u32;
                assert_eq!(p, expected, "{completed}/{total}");
            }
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let stats = UserStats {
            today_progress: DailyProgress::new(3, 4),
            streak: Streak {
                current: 2,
                longest: 5,
                this_month: 9,
            },
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["todayProgress"]["percentage"], 75);
        assert_eq!(json["streak"]["thisMonth"], 9);
    }
}
