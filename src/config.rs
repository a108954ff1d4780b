//! Command-line and environment configuration.
//!
//! Every flag can also be set through a `BLOCKFALL_*` environment variable; an explicit
//! flag wins over the environment.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::types::{DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Default upper bound for one commentary request.
pub const DEFAULT_COMMENTARY_TIMEOUT_MS: u64 = 1500;

#[derive(Debug, Clone, Parser)]
#[command(name = "blockfall", version, about = "Candy-colored falling-block puzzle")]
pub struct Config {
    /// Seed for the piece sequence (defaults to the current time)
    #[arg(long, env = "BLOCKFALL_SEED")]
    pub seed: Option<u32>,

    /// Start with sound effects muted
    #[arg(long, env = "BLOCKFALL_MUTED")]
    pub muted: bool,

    /// Disable announcer lines after clears
    #[arg(long, env = "BLOCKFALL_NO_COMMENTARY")]
    pub no_commentary: bool,

    /// Program that answers announcer prompts on stdin (defaults to canned phrases)
    #[arg(long, env = "BLOCKFALL_COMMENTARY_COMMAND")]
    pub commentary_command: Option<String>,

    /// Upper bound for one announcer request, in milliseconds
    #[arg(
        long,
        env = "BLOCKFALL_COMMENTARY_TIMEOUT_MS",
        default_value_t = DEFAULT_COMMENTARY_TIMEOUT_MS
    )]
    pub commentary_timeout_ms: u64,

    /// Delay before a held horizontal key starts repeating, in milliseconds
    #[arg(long, env = "BLOCKFALL_DAS_MS", default_value_t = DEFAULT_DAS_MS)]
    pub das_ms: u32,

    /// Interval between horizontal repeats, in milliseconds
    #[arg(long, env = "BLOCKFALL_ARR_MS", default_value_t = DEFAULT_ARR_MS)]
    pub arr_ms: u32,

    /// Write diagnostics to this file (the terminal is taken by the game)
    #[arg(long, env = "BLOCKFALL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Append one JSON line per game event to this file
    #[arg(long, env = "BLOCKFALL_EVENT_LOG")]
    pub event_log: Option<PathBuf>,

    /// Increase log verbosity (-v = DEBUG, -vv = TRACE)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Seed to use: the configured one, or one derived from the clock.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u32)
                .unwrap_or(1)
        })
    }

    pub fn commentary_timeout(&self) -> Duration {
        Duration::from_millis(self.commentary_timeout_ms)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
