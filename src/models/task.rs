use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Finished,
    /// A value written by some other client that this build does not know.
    /// Kept verbatim so a round-trip through the store does not rewrite it.
    #[serde(untagged)]
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Finished => "Finished",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// Only an explicit `Finished` marker credits a task as complete.
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Finished)
    }

    /// Next status in the Not Started → In Progress → Finished cycle.
    /// Unknown values restart the cycle.
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::NotStarted => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Finished,
            TaskStatus::Finished | TaskStatus::Other(_) => TaskStatus::NotStarted,
        }
    }

    /// Parse a value read back from the store. Never fails; only the exact
    /// canonical spellings map to known variants.
    pub fn from_stored(s: &str) -> TaskStatus {
        match s {
            "Not Started" => TaskStatus::NotStarted,
            "In Progress" => TaskStatus::InProgress,
            "Finished" => TaskStatus::Finished,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    /// Strict parse used for user input; accepts a few spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "notstarted" | "todo" => Ok(TaskStatus::NotStarted),
            "inprogress" | "doing" => Ok(TaskStatus::InProgress),
            "finished" | "done" => Ok(TaskStatus::Finished),
            _ => Err(anyhow::anyhow!("Unknown task status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub work_log_id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: Option<String>,
}

impl Task {
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_spellings() {
        assert_eq!("finished".parse::<TaskStatus>().unwrap(), TaskStatus::Finished);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Finished);
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("Not Started".parse::<TaskStatus>().unwrap(), TaskStatus::NotStarted);
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn unknown_stored_status_is_kept_and_not_finished() {
        let status = TaskStatus::from_stored("Blocked");
        assert_eq!(status, TaskStatus::Other("Blocked".to_string()));
        assert_eq!(status.as_str(), "Blocked");
        assert!(!status.is_finished());
    }

    #[test]
    fn stored_status_must_match_exactly() {
        assert!(TaskStatus::from_stored("Finished").is_finished());
        assert!(!TaskStatus::from_stored("finished").is_finished());
    }

    #[test]
    fn cycle_wraps_around() {
        let mut status = TaskStatus::NotStarted;
        for _ in 0..3 {
            status = status.next();
        }
        assert_eq!(status, TaskStatus::NotStarted);
        assert_eq!(TaskStatus::Other("x".into()).next(), TaskStatus::NotStarted);
    }
}
