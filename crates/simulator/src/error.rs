//! Simulator errors

use race_engine::EngineError;
use race_scheduler::SchedulerError;
use ring_buffer::BufferError;
use thiserror::Error;

/// Settings that load fine but make no sense together
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("render_every must be at least 1")]
    ZeroRenderCadence,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// Anything that stops a simulation run
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Transport error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Race setup error: {0}")]
    Engine(#[from] EngineError),

    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Thread {0} panicked")]
    ThreadPanicked(&'static str),
}

impl SimError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::Config(_)
            | SimError::Load(_)
            | SimError::Buffer(_)
            | SimError::Scheduler(_)
            | SimError::Engine(_) => 2,
            SimError::Spawn(_) | SimError::ThreadPanicked(_) => 1,
        }
    }
}
