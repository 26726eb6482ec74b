//! Periodic Scheduler Implementation

use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Scheduler construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// Tick rate must be finite and positive
    #[error("Invalid tick rate: {0} Hz")]
    InvalidRate(f64),
}

/// Configuration for the periodic scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Target tick rate in Hz (default: 50.0)
    pub rate_hz: f64,
    /// Sleep until each deadline; when false, ticks run back to back
    pub paced: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            rate_hz: 50.0,
            paced: true,
        }
    }
}

impl SchedulerConfig {
    /// Run as fast as possible while keeping the nominal rate for bookkeeping
    pub fn unpaced(rate_hz: f64) -> Self {
        Self {
            rate_hz,
            paced: false,
        }
    }
}

/// Summary of a finished scheduler run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerReport {
    /// Ticks executed
    pub ticks: u64,
    /// Ticks whose deadline had already passed when the previous one returned
    pub overruns: u64,
    /// Worst lateness observed
    pub max_lateness: Duration,
    /// True when the tick function ended the run, false when `should_stop` did
    pub completed: bool,
}

/// Fixed-rate tick driver with phase-accumulated deadlines
#[derive(Debug, Clone)]
pub struct PeriodicScheduler {
    period: Duration,
    paced: bool,
}

impl PeriodicScheduler {
    /// Create a new scheduler
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        if !config.rate_hz.is_finite() || config.rate_hz <= 0.0 {
            return Err(SchedulerError::InvalidRate(config.rate_hz));
        }

        Ok(Self {
            period: Duration::from_secs_f64(1.0 / config.rate_hz),
            paced: config.paced,
        })
    }

    /// Interval between tick deadlines
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Check if the scheduler sleeps between ticks
    pub fn is_paced(&self) -> bool {
        self.paced
    }

    /// Run the tick loop.
    ///
    /// `should_stop` is polled before every tick; a tick returning
    /// `ControlFlow::Break` ends the loop at once without waiting for the
    /// next deadline. A late tick starts immediately; if the loop fell more
    /// than a whole period behind, the phase is re-anchored to now rather
    /// than replaying the missed ticks in a burst.
    pub fn run<F, S>(&self, mut tick: F, mut should_stop: S) -> SchedulerReport
    where
        F: FnMut(u64) -> ControlFlow<()>,
        S: FnMut() -> bool,
    {
        info!(
            "Starting periodic scheduler (period {:?}, paced: {})",
            self.period, self.paced
        );

        let mut report = SchedulerReport::default();
        let mut next_deadline = Instant::now();

        loop {
            if should_stop() {
                debug!("Stop requested before tick {}", report.ticks);
                break;
            }

            let flow = tick(report.ticks);
            report.ticks += 1;
            if flow.is_break() {
                report.completed = true;
                break;
            }

            if !self.paced {
                continue;
            }

            next_deadline += self.period;
            let now = Instant::now();
            if now < next_deadline {
                thread::sleep(next_deadline - now);
                continue;
            }

            let lateness = now - next_deadline;
            report.overruns += 1;
            report.max_lateness = report.max_lateness.max(lateness);
            metrics::counter!("scheduler.overruns").increment(1);
            debug!("Tick {} overran its deadline by {:?}", report.ticks, lateness);

            if lateness > self.period {
                next_deadline = now;
            }
        }

        info!(
            "Periodic scheduler stopped after {} ticks ({} overruns)",
            report.ticks, report.overruns
        );
        report
    }
}
