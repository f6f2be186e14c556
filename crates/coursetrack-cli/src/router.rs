// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::commands::*;
use crate::context::{load_config, AppContext};
use crate::error::CliResult;
use crate::output;

/// coursetrack - course completion tracking
#[derive(Parser, Debug)]
#[command(name = "coursetrack")]
#[command(bin_name = "coursetrack")]
#[command(about = "Track course completion from enrolment to completion")]
#[command(
    long_about = "coursetrack: records when users enrol in, start and complete courses.\n\nState is read from a JSON snapshot (--data) and written back with --save.\nEvery command prints its result as JSON."
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snapshot file holding courses, enrolments, criteria and records
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Configuration file (default: <config dir>/coursetrack/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the snapshot back after the command
    #[arg(long, global = true)]
    pub save: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// User and course of a completion record
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RecordArgs {
    /// User id
    #[arg(long, value_name = "ID")]
    pub user: i64,

    /// Course id
    #[arg(long, value_name = "ID")]
    pub course: i64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Handle a user-enrolled event
    #[command(about = "Handle a user-enrolled event (starts the user if the course says so)")]
    Enrol {
        #[command(flatten)]
        record: RecordArgs,

        /// Enrolment start, Unix seconds (default: now)
        #[arg(long, value_name = "SECS")]
        time: Option<i64>,
    },

    /// Mark a user as started in a course
    #[command(about = "Mark a user as in progress in a course")]
    Start {
        #[command(flatten)]
        record: RecordArgs,

        /// Start time, Unix seconds (default: now)
        #[arg(long, value_name = "SECS")]
        time: Option<i64>,
    },

    /// Mark a course as complete for a user
    #[command(about = "Mark a course complete for a user")]
    Complete {
        #[command(flatten)]
        record: RecordArgs,

        /// Completion time, Unix seconds (default: now)
        #[arg(long, value_name = "SECS")]
        time: Option<i64>,
    },

    /// Recompute a user's status from the course criteria
    #[command(about = "Aggregate a user's criteria into the course status")]
    Aggregate {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Create records for every live participant of a course
    #[command(name = "bulk-start", about = "Create completion records for every live participant")]
    BulkStart {
        /// Course id
        #[arg(long, value_name = "ID")]
        course: i64,
    },

    /// Re-evaluate flagged records of a course
    #[command(about = "Aggregate every record of a course flagged for reaggregation")]
    Reaggregate {
        /// Course id
        #[arg(long, value_name = "ID")]
        course: i64,

        /// Flag every incomplete record first
        #[arg(long)]
        all: bool,
    },

    /// Completion report of a user
    #[command(about = "Show a user's completion status per course")]
    Report {
        /// User id
        #[arg(long, value_name = "ID")]
        user: i64,

        /// Restrict the report to one course
        #[arg(long, value_name = "ID")]
        course: Option<i64>,
    },

    /// Show the stored record of a user in a course
    #[command(about = "Show the stored completion record")]
    Show {
        #[command(flatten)]
        record: RecordArgs,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Load configuration and data, then run the parsed command
    pub async fn run(cli: &Cli) -> CliResult<()> {
        let config = load_config(cli.config.as_deref())?;
        let level = crate::logging::init_logging(&config.log_level, cli.verbose, cli.quiet);
        debug!(%level, "logging initialised");

        let ctx = AppContext::open(cli.data.clone(), config)?;
        let value = Self::execute(&cli.command, &ctx).await?;
        output::print_json(&value)?;

        if cli.save {
            ctx.persist()?;
        }
        Ok(())
    }

    /// Execute a command
    pub async fn execute(command: &Commands, ctx: &AppContext) -> CliResult<serde_json::Value> {
        match command {
            Commands::Enrol { record, time } => {
                EnrolCommand::new(*record, *time).execute(ctx).await
            }
            Commands::Start { record, time } => {
                StartCommand::new(*record, *time).execute(ctx).await
            }
            Commands::Complete { record, time } => {
                CompleteCommand::new(*record, *time).execute(ctx).await
            }
            Commands::Aggregate { record } => AggregateCommand::new(*record).execute(ctx).await,
            Commands::BulkStart { course } => BulkStartCommand::new(*course).execute(ctx).await,
            Commands::Reaggregate { course, all } => {
                ReaggregateCommand::new(*course)
                    .with_flag_all(*all)
                    .execute(ctx)
                    .await
            }
            Commands::Report { user, course } => {
                ReportCommand::new(*user, *course).execute(ctx).await
            }
            Commands::Show { record } => ShowCommand::new(*record).execute(ctx).await,
        }
    }
}
