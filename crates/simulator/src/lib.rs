//! F1 Telemetry Simulator
//!
//! Composition root: resolves configuration, picks a transport, and runs
//! the race engine and the telemetry UI on their own threads.

mod cli;
mod error;
mod logging;
mod runner;
mod settings;

pub use cli::Cli;
pub use error::{ConfigError, SimError};
pub use logging::init_logging;
pub use runner::{ClassifiedCar, RunSummary, ShutdownHandle, Simulation};
pub use settings::{SimulatorConfig, TransportKind, ENV_PREFIX};
