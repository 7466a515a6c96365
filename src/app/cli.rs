//! Command-line argument definitions (clap).

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "power")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "All-in-one tool for remote server power control", long_about = None)]
pub struct Args {
    /// JSON configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Backend used to switch the server on or off (overrides backend.kind)
    #[arg(short = 'b', long, global = true)]
    pub backend: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the server state
    State,

    /// Start the server and monitor its startup
    Up {
        /// Print the startup result on stdout instead of the configured notifier
        #[arg(short, long)]
        wait: bool,
    },

    /// Turn off the server
    Down,

    /// Show the startup polling schedule
    Schedule(ScheduleArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ScheduleArgs {
    /// Total monitoring time in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Shortest interval between checks in seconds
    #[arg(long)]
    pub min: Option<f64>,

    /// Longest interval between checks in seconds
    #[arg(long)]
    pub max: Option<f64>,

    /// How quickly intervals shrink; smaller values tighten sooner
    #[arg(long = "curve-shift")]
    pub curve_shift: Option<f64>,

    /// Multiplier applied to the interpolated interval
    #[arg(long)]
    pub factor: Option<f64>,
}
