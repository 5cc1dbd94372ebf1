use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::cli::args::TaskCommands;
use crate::config::AppConfig;
use crate::db::repository::{date_key, TaskRepo, WorkLogRepo};
use crate::db::SqliteStore;
use crate::models::{TaskStatus, UserStats};
use crate::stats::calculator::first_day_of_month;
use crate::stats::milestone::celebration;
use crate::stats::StatsCalculator;
use crate::utils::format::{day_count, encouragement, parse_date, progress_bar, progress_title};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! writeln_colored {
    ($out:expr, $color:expr, $($arg:tt)*) => {
        writeln!($out, "{}{}\x1b[0m", $color, format_args!($($arg)*))
    };
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const PURPLE: &str = "\x1b[38;2;168;85;247m";

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn compute(conn: &Connection, user_id: &str, date: NaiveDate) -> Result<UserStats> {
    let store = SqliteStore::new(conn);
    let stats = StatsCalculator::new(&store).compute(user_id, Some(date))?;
    Ok(stats)
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    out: &mut impl Write,
    conn: &Connection,
    user_id: &str,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let date = resolve_date(date)?;
    let stats = compute(conn, user_id, date)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }

    let today = Local::now().date_naive();
    let progress = &stats.today_progress;

    writeln!(out)?;
    writeln_colored!(out, PURPLE, "  {}", progress_title(date, today))?;
    writeln!(out)?;
    writeln_colored!(
        out,
        BOLD,
        "  {:>3}%  {}  {}/{}",
        progress.percentage,
        progress_bar(progress.completed, progress.total, 20),
        progress.completed,
        progress.total
    )?;
    writeln_colored!(out, PURPLE, "  {}", encouragement(progress.percentage))?;
    writeln!(out)?;
    writeln_colored!(out, AMBER, "  Current Streak:  {}", day_count(stats.streak.current))?;
    writeln!(out, "  Longest Streak:  {} days", stats.streak.longest)?;
    writeln!(out, "  This Month:      {} days", stats.streak.this_month)?;
    writeln!(out)?;
    Ok(())
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

pub fn handle_task(
    out: &mut impl Write,
    conn: &Connection,
    user_id: &str,
    action: &TaskCommands,
) -> Result<()> {
    match action {
        TaskCommands::Add { title, date } => {
            let title = title.trim();
            if title.is_empty() {
                return Err(anyhow!("Task title must not be empty"));
            }
            let date = resolve_date(date.as_deref())?;
            let task = TaskRepo::add(conn, user_id, date, title)?;
            writeln_colored!(
                out,
                GREEN,
                "  ✓ Task Added Successfully! #{} {} ({})",
                task.id,
                task.title,
                date_key(date)
            )?;
        }
        TaskCommands::List { date } => {
            let date = resolve_date(date.as_deref())?;
            let tasks = WorkLogRepo::find_by_date(conn, user_id, date)?
                .map(|log| log.tasks)
                .unwrap_or_default();
            writeln!(out)?;
            writeln_colored!(out, PURPLE, "  Tasks for {}", date_key(date))?;
            writeln!(out)?;
            if tasks.is_empty() {
                writeln_colored!(out, DIM, "  No tasks yet")?;
            }
            for task in &tasks {
                let (icon, color) = match task.status {
                    TaskStatus::Finished => ("✓", GREEN),
                    TaskStatus::InProgress => ("◑", AMBER),
                    _ => ("○", DIM),
                };
                writeln!(
                    out,
                    "  {}{}\x1b[0m {:>4}  {:<40}  {}",
                    color, icon, task.id, task.title, task.status
                )?;
            }
            writeln!(out)?;
        }
        TaskCommands::Done { id } => {
            set_status(out, conn, user_id, *id, TaskStatus::Finished)?;
        }
        TaskCommands::Status { id, status } => {
            let status = TaskStatus::from_str(status).map_err(|_| {
                anyhow!(
                    "Unknown status '{}'. Use: not-started, in-progress, finished",
                    status
                )
            })?;
            set_status(out, conn, user_id, *id, status)?;
        }
        TaskCommands::Remove { id } => {
            if !TaskRepo::remove(conn, user_id, *id)? {
                return Err(anyhow!("No task #{} for user '{}'", id, user_id));
            }
            writeln_colored!(out, DIM, "  Task #{} removed", id)?;
        }
    }
    Ok(())
}

fn set_status(
    out: &mut impl Write,
    conn: &Connection,
    user_id: &str,
    task_id: i64,
    status: TaskStatus,
) -> Result<()> {
    let (task, date) = TaskRepo::find(conn, user_id, task_id)?
        .ok_or_else(|| anyhow!("No task #{} for user '{}'", task_id, user_id))?;

    let before = compute(conn, user_id, date)?;
    TaskRepo::set_status(conn, user_id, task_id, &status)?;
    let after = compute(conn, user_id, date)?;

    writeln_colored!(
        out,
        GREEN,
        "  ✨ Progress Saved! #{} {} → {}",
        task.id,
        task.title,
        status
    )?;
    if let Some(message) = celebration(&before, &after) {
        writeln_colored!(out, AMBER, "  🏆 Achievement Unlocked! {}", message)?;
    }
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(
    out: &mut impl Write,
    conn: &Connection,
    user_id: &str,
    date: Option<&str>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let date = resolve_date(date)?;
    let stats = compute(conn, user_id, date)?;
    let logs = WorkLogRepo::list_since(conn, user_id, first_day_of_month(today))?;

    writeln!(out, "# dado — Monthly Summary")?;
    writeln!(out, "# {}", date_key(today))?;
    writeln!(out)?;
    writeln!(out, "User: {}", user_id)?;
    writeln!(out)?;
    writeln!(out, "## Days this month")?;
    for log in &logs {
        writeln!(
            out,
            "  {}  {:>2}/{:<2}  {}",
            date_key(log.date),
            log.completed(),
            log.total(),
            progress_bar(log.completed(), log.total(), 10)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "## Summary")?;
    writeln!(
        out,
        "  {}:  {}/{} ({}%)",
        progress_title(date, today),
        stats.today_progress.completed,
        stats.today_progress.total,
        stats.today_progress.percentage
    )?;
    writeln!(out, "  Current streak:  {}", day_count(stats.streak.current))?;
    writeln!(out, "  Longest streak:  {} days", stats.streak.longest)?;
    writeln!(out, "  This month:      {} days", stats.streak.this_month)?;
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Show the configuration stored at `config_path`, saving a new default
/// user there first when one is given.
pub fn handle_config(
    out: &mut impl Write,
    config: &mut AppConfig,
    config_path: &Path,
    set_user: Option<&str>,
) -> Result<()> {
    if let Some(user) = set_user {
        let user = user.trim();
        if user.is_empty() {
            return Err(anyhow!("User id must not be empty"));
        }
        config.user.id = user.to_string();
        config.save_to(config_path)?;
        writeln_colored!(out, GREEN, "  ✓ Default user set to '{}'", user)?;
    }

    writeln!(out)?;
    writeln_colored!(out, PURPLE, "  Configuration")?;
    writeln!(out)?;
    writeln!(out, "  File:        {}", config_path.display())?;
    match AppConfig::db_path() {
        Ok(db_path) => writeln!(out, "  Database:    {}", db_path.display())?,
        Err(_) => writeln!(out, "  Database:    (no home directory)")?,
    }
    writeln!(out, "  User:        {}", config.user.id)?;
    writeln!(
        out,
        "  Popup:       {} ({} ms, fade {} ms)",
        if config.popup.enabled { "on" } else { "off" },
        config.popup.auto_dismiss_ms,
        config.popup.fade_ms
    )?;
    writeln!(out)?;
    Ok(())
}
