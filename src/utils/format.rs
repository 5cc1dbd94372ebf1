use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::db::repository::{date_key, DATE_FORMAT};

/// Canned encouragement for a completion percentage.
pub fn encouragement(percentage: u32) -> &'static str {
    if percentage >= 80 {
        "🎯 Almost there! Finish strong!"
    } else if percentage >= 50 {
        "🔥 Keep going! You're on fire today!"
    } else if percentage > 0 {
        "💪 Great start! Keep up the momentum!"
    } else {
        "🎯 Ready to start your productive day?"
    }
}

/// "Today's Progress", or "2024-03-01's Progress" for any other day.
pub fn progress_title(selected: NaiveDate, today: NaiveDate) -> String {
    if selected == today {
        "Today's Progress".to_string()
    } else {
        format!("{}'s Progress", date_key(selected))
    }
}

/// "1 Day", "0 Days", "12 Days"
pub fn day_count(n: u32) -> String {
    if n == 1 {
        format!("{} Day", n)
    } else {
        format!("{} Days", n)
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| anyhow!("Bad date '{}': expected YYYY-MM-DD", s))
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Cut `s` to at most `max` terminal columns, marking the cut with "…".
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encouragement_bands() {
        assert!(encouragement(100).contains("Almost there"));
        assert!(encouragement(80).contains("Almost there"));
        assert!(encouragement(79).contains("on fire"));
        assert!(encouragement(50).contains("on fire"));
        assert!(encouragement(1).contains("Great start"));
        assert!(encouragement(0).contains("Ready to start"));
    }

    #[test]
    fn title_names_other_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(progress_title(today, today), "Today's Progress");
        assert_eq!(progress_title(other, today), "2024-03-01's Progress");
    }

    #[test]
    fn singular_day() {
        assert_eq!(day_count(1), "1 Day");
        assert_eq!(day_count(0), "0 Days");
        assert_eq!(day_count(7), "7 Days");
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("03/01/2024").is_err());
    }

    #[test]
    fn bar_handles_empty_total() {
        assert_eq!(progress_bar(0, 0, 4), "░░░░");
        assert_eq!(progress_bar(3, 4, 4), "███░");
    }

    #[test]
    fn truncation_respects_wide_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        // each CJK char is two columns wide
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }
}
