use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dado",
    version,
    author,
    about = "A friendly terminal companion for daily tasks and streaks"
)]
pub struct Cli {
    /// Act as this user instead of the one in config.toml
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show progress for a day and the current streaks
    Stats {
        /// Day to report on (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Print the stats as JSON
        #[arg(long)]
        json: bool,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Print a plain-text summary of the current month to stdout
    Export {
        /// Day whose progress heads the summary (default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show or change configuration
    Config {
        /// Store this user id as the default
        #[arg(long)]
        set_user: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a day
    Add {
        /// Task title
        title: String,
        /// Day to file it under (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List the tasks of a day
    List {
        /// Day to list (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a task as finished
    Done {
        /// Task id (see `dado task list`)
        id: i64,
    },
    /// Set a task's status: not-started, in-progress or finished
    Status {
        /// Task id
        id: i64,
        /// New status
        status: String,
    },
    /// Delete a task
    Remove {
        /// Task id
        id: i64,
    },
}
