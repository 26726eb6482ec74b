//! Fixed-Timestep Scheduler
//!
//! Drives a unit of work at a fixed wall-clock cadence. Deadlines are
//! phase-accumulated from the previous target, so an occasional slow tick
//! does not shift every tick after it.

mod scheduler;

pub use scheduler::{PeriodicScheduler, SchedulerConfig, SchedulerError, SchedulerReport};
