//! Layered configuration
//!
//! Precedence, lowest first: built-in defaults, the optional `--config`
//! file, `F1SIM_*` environment variables, command line flags.

use crate::{Cli, ConfigError, SimError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Environment variable prefix (`F1SIM_SEED`, `F1SIM_TRANSPORT`, ...)
pub const ENV_PREFIX: &str = "F1SIM";

/// Which transport connects the producer to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    /// Bounded FIFO ring buffer; every frame is delivered
    #[default]
    Queued,
    /// Double buffer; the consumer only sees the newest tick
    LatestOnly,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Queued => "queued",
            TransportKind::LatestOnly => "latest-only",
        }
    }
}

/// Fully resolved simulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub seed: u64,
    pub laps: u16,
    pub drivers: usize,
    pub transport: TransportKind,
    /// Frames the queued transport can hold
    pub capacity: usize,
    pub render_every: u32,
    /// Physics rate (default: 50.0)
    pub rate_hz: f64,
    /// Sleep until each tick deadline
    pub paced: bool,
    pub start_delay_ms: u64,
    pub color: bool,
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            laps: 5,
            drivers: 20,
            transport: TransportKind::Queued,
            capacity: ring_buffer::DEFAULT_CAPACITY,
            render_every: 5,
            rate_hz: 50.0,
            paced: true,
            start_delay_ms: 0,
            color: true,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl SimulatorConfig {
    /// Resolve settings from every layer and validate them
    pub fn load(cli: &Cli) -> Result<Self, SimError> {
        Self::load_from(cli, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Same as [`load`](Self::load) with an explicit environment source
    pub fn load_from(cli: &Cli, env: Environment) -> Result<Self, SimError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        let settings: Self = builder
            .add_source(env)
            .set_override_option("seed", cli.seed)?
            .set_override_option("laps", cli.laps.map(i64::from))?
            .set_override_option("drivers", cli.drivers.map(|n| n as u64))?
            .set_override_option("transport", cli.transport.map(|t| t.as_str()))?
            .set_override_option("capacity", cli.capacity.map(|n| n as u64))?
            .set_override_option("render_every", cli.render_every.map(i64::from))?
            .set_override_option("start_delay_ms", cli.start_delay_ms)?
            .set_override_option("paced", cli.unpaced.then_some(false))?
            .set_override_option("color", cli.no_color.then_some(false))?
            .set_override_option("log_level", cli.log_level())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the component constructors do not cover
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_every == 0 {
            return Err(ConfigError::ZeroRenderCadence);
        }
        self.level()?;
        Ok(())
    }

    /// Parsed log level
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
