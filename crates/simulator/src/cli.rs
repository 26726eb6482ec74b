//! Command line interface

use crate::TransportKind;
use clap::Parser;
use std::path::PathBuf;

/// F1 real-time telemetry simulator
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "f1-telemetry-sim", version)]
#[command(about = "Deterministic F1 race simulation streaming telemetry to a live console")]
pub struct Cli {
    /// Random seed for deterministic replay [default: 42]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Race distance in laps [default: 5]
    #[arg(long)]
    pub laps: Option<u16>,

    /// Cars on the grid, 1-20 [default: 20]
    #[arg(long)]
    pub drivers: Option<usize>,

    /// Producer to consumer transport [default: queued]
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    /// Queued transport capacity in frames [default: 1024]
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Render once every N ticks of the clock car [default: 5]
    #[arg(long)]
    pub render_every: Option<u32>,

    /// Run ticks back to back instead of at 50 Hz
    #[arg(long)]
    pub unpaced: bool,

    /// Pause before the start lights [default: 0]
    #[arg(long)]
    pub start_delay_ms: Option<u64>,

    /// Disable ANSI team colours
    #[arg(long)]
    pub no_color: bool,

    /// Optional config file (TOML, YAML, JSON, ...)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log level requested on the command line, if any
    pub fn log_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
