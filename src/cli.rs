use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "tasks", version, about = "A task list in your terminal")]
pub struct Cli {
    /// Write logs to this file. Without it nothing is logged.
    #[arg(long = "log-file", env = "TASKS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Redraw interval in milliseconds
    #[arg(long = "tick-rate", default_value_t = 250, value_parser = clap::value_parser!(u64).range(10..))]
    pub tick_rate_ms: u64,
}

impl Cli {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    // Level used when RUST_LOG is not set
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet >= 2 {
            "error"
        } else if self.quiet == 1 {
            "warn"
        } else if self.verbose >= 2 {
            "trace"
        } else if self.verbose == 1 {
            "debug"
        } else {
            "info"
        }
    }
}
