//! Race Engine - The Producer
//!
//! Owns the simulation state exclusively. Each tick it advances every car
//! once, re-ranks the field, and publishes one frame per car.

use crate::physics::{CarEvent, CarState, BASE_SPEED_KMH, DT, SAFETY_CAR_DURATION, TICK_MS};
use crate::profiles::{car_profile, driver_profile, CarProfile, DriverProfile};
use crate::{EngineConfig, EngineError};
use race_scheduler::{PeriodicScheduler, SchedulerReport};
use race_telemetry::{flags, FrameSink, TelemetryFrame};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// How the producer loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerOutcome {
    /// The leader completed the race distance (or every car retired)
    Finished,
    /// The transport was shut down from elsewhere
    Interrupted,
}

/// Summary of a producer run
#[derive(Debug, Clone)]
pub struct ProducerReport {
    pub outcome: ProducerOutcome,
    /// Ticks simulated
    pub ticks: u64,
    /// Frames handed to the sink (excludes a truncated final tick)
    pub frames_published: u64,
    pub scheduler: SchedulerReport,
}

/// Deterministic race simulation
pub struct RaceEngine {
    config: EngineConfig,
    cars: Vec<CarState>,
    car_profiles: Vec<CarProfile>,
    driver_profiles: Vec<DriverProfile>,
    rng: ChaCha8Rng,
    tick: u64,
    safety_car_timer: f32,
    frames: Vec<TelemetryFrame>,
}

impl RaceEngine {
    /// Create a new engine with the field on the grid
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let driver_profiles: Vec<_> = (0..config.drivers).map(driver_profile).collect();
        let car_profiles: Vec<_> = (0..config.drivers).map(car_profile).collect();
        let cars = driver_profiles
            .iter()
            .enumerate()
            .map(|(id, driver)| CarState::on_grid(id as u8, driver))
            .collect();

        info!(
            "Race engine created: {} drivers, {} laps, seed {}",
            config.drivers, config.total_laps, config.seed
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            frames: Vec::with_capacity(config.drivers),
            config,
            cars,
            car_profiles,
            driver_profiles,
            tick: 0,
            safety_car_timer: 0.0,
        })
    }

    /// Get the race configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks simulated so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Race time in seconds
    pub fn race_time(&self) -> f32 {
        self.tick as f32 * DT
    }

    /// Current per-car state, indexed by driver id
    pub fn cars(&self) -> &[CarState] {
        &self.cars
    }

    /// Check if a safety car period is active
    pub fn safety_car_active(&self) -> bool {
        self.safety_car_timer > 0.0
    }

    /// Advance the race by one tick and build this tick's frames.
    ///
    /// Failures are rolled before anyone moves, so a retirement caps the
    /// rest of the field on the same tick it happens.
    pub fn step(&mut self) -> &[TelemetryFrame] {
        self.tick += 1;
        let race_time = self.race_time();

        let mut retirements = 0;
        for (idx, state) in self.cars.iter_mut().enumerate() {
            if state.retired {
                continue;
            }
            if CarState::roll_retirement(&self.car_profiles[idx], &mut self.rng) {
                state.retire();
                retirements += 1;
                warn!("Driver {} retired on lap {}", idx, state.lap);
            }
        }
        if retirements > 0 {
            self.deploy_safety_car();
        }
        let safety_car = self.safety_car_active();

        for idx in 0..self.cars.len() {
            let car = &self.car_profiles[idx];
            let driver = &self.driver_profiles[idx];
            let state = &mut self.cars[idx];

            match state.advance(car, driver, safety_car, race_time, &mut self.rng) {
                CarEvent::EnteredPits => debug!("Driver {} pitting on lap {}", idx, state.lap),
                CarEvent::ExitedPits => {
                    debug!("Driver {} rejoined after {} stops", idx, state.pit_stops)
                }
                CarEvent::CompletedLap => debug!(
                    "Driver {} started lap {} (last lap {:.3}s)",
                    idx, state.lap, state.last_lap_time
                ),
                CarEvent::None => {}
            }
        }

        if retirements == 0 {
            self.safety_car_timer = (self.safety_car_timer - DT).max(0.0);
        }

        self.update_race_order();
        self.build_frames(safety_car);
        &self.frames
    }

    /// Force a car out of the race, deploying the safety car
    pub fn retire(&mut self, driver_id: usize) {
        if let Some(state) = self.cars.get_mut(driver_id) {
            if !state.retired {
                state.retire();
                self.deploy_safety_car();
            }
        }
    }

    fn deploy_safety_car(&mut self) {
        if !self.safety_car_active() {
            info!("Safety car deployed at {:.1}s", self.race_time());
        }
        self.safety_car_timer = SAFETY_CAR_DURATION;
    }

    /// Rank by distance; ties go to the lower driver id
    fn update_race_order(&mut self) {
        let mut order: Vec<usize> = (0..self.cars.len()).collect();
        order.sort_by(|&a, &b| {
            self.cars[b]
                .distance
                .total_cmp(&self.cars[a].distance)
                .then(a.cmp(&b))
        });

        for (rank, idx) in order.into_iter().enumerate() {
            self.cars[idx].position = (rank + 1) as u8;
        }
    }

    fn build_frames(&mut self, safety_car: bool) {
        let timestamp_ms = (self.tick as u32).wrapping_mul(TICK_MS);
        let leader_distance = self
            .cars
            .iter()
            .map(|c| c.distance)
            .fold(f32::NEG_INFINITY, f32::max);
        let reference_speed_ms = BASE_SPEED_KMH / 3.6;

        self.frames.clear();
        for (idx, state) in self.cars.iter().enumerate() {
            let mut frame = TelemetryFrame::new(state.driver_id, timestamp_ms);
            frame.position = state.position;
            frame.lap = state.lap;
            frame.sector = state.sector;
            frame.speed = state.speed;
            frame.distance = state.distance;
            frame.tire_wear = state.tire_wear * 100.0;
            frame.sector_times = state.sector_times;
            frame.last_lap_time = state.last_lap_time;
            frame.gap_to_leader = (leader_distance - state.distance) / reference_speed_ms;

            frame.throttle = if state.in_pits || state.retired {
                0.0
            } else {
                let top = CarState::top_speed(&self.car_profiles[idx], &self.driver_profiles[idx]);
                (state.speed / top).clamp(0.0, 1.0)
            };

            if state.in_pits {
                frame.flags |= flags::IN_PITS;
            }
            if state.retired {
                frame.flags |= flags::DNF;
            } else if safety_car {
                frame.flags |= flags::SAFETY_CAR;
            }
            self.frames.push(frame);
        }
    }

    /// The leader has started lap `total_laps + 1`, or nobody is left running
    pub fn is_race_complete(&self) -> bool {
        let leader_done = self
            .cars
            .iter()
            .any(|c| c.position == 1 && c.lap > self.config.total_laps);
        leader_done || self.cars.iter().all(|c| c.retired)
    }

    /// Run the producer loop until the race ends or the sink shuts down.
    ///
    /// A shutdown observed mid-tick stops publishing at once, so the final
    /// tick may reach the consumer only partially. On race completion the
    /// sink is shut down here and the loop exits without waiting for the
    /// next deadline.
    pub fn run<S>(&mut self, sink: &S, scheduler: &PeriodicScheduler) -> ProducerReport
    where
        S: FrameSink + ?Sized,
    {
        info!("Race start: {} laps", self.config.total_laps);
        let mut outcome = ProducerOutcome::Interrupted;
        let mut frames_published = 0u64;

        let scheduler_report = scheduler.run(
            |_| {
                let tick = self.tick + 1;
                let frames = self.step();
                if sink.publish(tick, frames).is_err() {
                    info!("Sink shut down during tick {}, stopping producer", tick);
                    return ControlFlow::Break(());
                }
                frames_published += frames.len() as u64;
                metrics::counter!("race.ticks").increment(1);
                metrics::counter!("race.frames_published").increment(frames.len() as u64);

                if self.is_race_complete() {
                    outcome = ProducerOutcome::Finished;
                    info!(
                        "Race complete after {} ticks ({:.1}s)",
                        self.tick,
                        self.race_time()
                    );
                    sink.shutdown();
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            },
            || sink.is_shutdown(),
        );

        ProducerReport {
            outcome,
            ticks: self.tick,
            frames_published,
            scheduler: scheduler_report,
        }
    }
}

/// Laps completed by the leader, for progress reporting
pub fn leader_lap(cars: &[CarState]) -> Option<u16> {
    cars.iter().find(|c| c.position == 1).map(|c| c.lap)
}

impl std::fmt::Debug for RaceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceEngine")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("leader_lap", &leader_lap(&self.cars))
            .field("safety_car_timer", &self.safety_car_timer)
            .finish()
    }
}
