mod cli;
mod config;
mod db;
mod models;
mod stats;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rusqlite::Connection;
use std::io;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = AppConfig::config_path()?;
    let mut config = AppConfig::load_from(&config_path).context("Loading config")?;
    let mut out = io::stdout().lock();

    // Config needs no database
    if let Some(Commands::Config { set_user }) = &cli.command {
        let set_user = set_user.as_deref();
        return handlers::handle_config(&mut out, &mut config, &config_path, set_user);
    }

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    let user_id = cli.user.clone().unwrap_or_else(|| config.user.id.clone());
    info!("dado starting for user '{}' ({:?})", user_id, db_path);

    match cli.command {
        Some(Commands::Stats { date, json }) => {
            handlers::handle_stats(&mut out, &conn, &user_id, date.as_deref(), json)?;
        }
        Some(Commands::Task { action }) => {
            handlers::handle_task(&mut out, &conn, &user_id, &action)?;
        }
        Some(Commands::Export { date }) => {
            handlers::handle_export(&mut out, &conn, &user_id, date.as_deref())?;
        }
        Some(Commands::Config { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            drop(out);
            tui::app::run(conn, config, user_id)?;
        }
    }

    Ok(())
}
