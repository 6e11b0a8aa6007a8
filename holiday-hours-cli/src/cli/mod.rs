//! Command-line interface

pub mod commands;
pub mod menu;

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

pub use commands::App;

#[derive(Parser, Debug)]
#[command(name = "holiday-hours-cli")]
#[command(about = "Sync Zoom Phone holiday hours with a declared schedule", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only touch the first entity of each collection
    #[arg(long, global = true)]
    pub testing: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the desired holiday schedule
    Hours,
    /// Print account counts
    Summary,
    /// Reconcile external entities with the schedule
    Update {
        #[arg(value_enum)]
        target: UpdateTarget,
        /// Print the planned operations without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete every holiday from all external auto receptionists and call queues
    RemoveAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the first external entity as JSON
    Inspect {
        #[arg(value_enum)]
        target: InspectTarget,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateTarget {
    /// External auto receptionists
    Ars,
    /// External call queues
    Cqs,
    /// Auto receptionists, then call queues after a refresh
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InspectTarget {
    Ar,
    Cq,
}

/// Phase a fatal error happened in; decides the process exit code.
///
/// Attached as anyhow context so `main` can find it with `downcast_ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadHours,
    Connect,
    Refresh,
    Run,
}

impl Stage {
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::LoadHours => 404,
            Stage::Connect => 500,
            Stage::Refresh => 1001,
            Stage::Run => 1003,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::LoadHours => write!(f, "Error loading the holiday schedule"),
            Stage::Connect => write!(f, "Error with the access token"),
            Stage::Refresh => write!(f, "Error grabbing Zoom account information"),
            Stage::Run => write!(f, "Run failed"),
        }
    }
}

/// Exit code for a fatal error, based on the innermost-known stage
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Stage>()
        .map(|stage| stage.exit_code())
        .unwrap_or_else(|| Stage::Run.exit_code())
}
