//! Thread orchestration
//!
//! One producer thread (`race-producer`) runs the engine; one consumer
//! thread (`race-consumer`) runs the UI. They share nothing but the
//! transport, which is chosen once here and handed to both as an `Arc`.

use crate::{SimError, SimulatorConfig, TransportKind};
use race_engine::physics::BASE_SPEED_KMH;
use race_engine::{CarState, EngineConfig, ProducerOutcome, RaceEngine};
use race_scheduler::{PeriodicScheduler, SchedulerConfig};
use race_telemetry::{DriverInfo, FrameSink, FrameSource, RaceSnapshot, TelemetryFrame};
use ring_buffer::{LatestOnlyTransport, QueuedTransport, RingBuffer, SharedState};
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use telemetry_ui::{ConsoleRenderer, Renderer, TelemetryUi, UiConfig};
use tracing::{error, info, warn};

enum Channel {
    Queued(Arc<QueuedTransport<TelemetryFrame>>),
    LatestOnly(Arc<LatestOnlyTransport<RaceSnapshot>>),
}

/// Stops a running simulation from any thread (e.g. a signal handler)
#[derive(Clone)]
pub struct ShutdownHandle {
    sink: Arc<dyn FrameSink>,
}

impl ShutdownHandle {
    /// Shut the transport down; both threads wind down on their own
    pub fn shutdown(&self) {
        self.sink.shutdown();
    }

    pub fn is_shutdown(&self) -> bool {
        self.sink.is_shutdown()
    }
}

/// One car's final classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedCar {
    pub position: u8,
    pub driver_id: u8,
    pub name: &'static str,
    pub team: &'static str,
    pub laps_completed: u16,
    /// Seconds behind the leader at reference pace
    pub gap_to_leader: f32,
    pub last_lap_time: f32,
    pub pit_stops: u16,
    pub retired: bool,
}

/// What happened during a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub laps: u16,
    pub drivers: usize,
    pub transport: TransportKind,
    pub outcome: ProducerOutcome,
    pub ticks: u64,
    pub race_time_secs: f32,
    pub frames_published: u64,
    pub frames_received: u64,
    pub renders: u64,
    pub scheduler_overruns: u64,
    pub wall_time_ms: u64,
    pub classification: Vec<ClassifiedCar>,
}

impl RunSummary {
    /// True when the race ran to the flag
    pub fn finished(&self) -> bool {
        self.outcome == ProducerOutcome::Finished
    }
}

/// A fully validated simulation, ready to start
pub struct Simulation {
    config: SimulatorConfig,
    engine: RaceEngine,
    scheduler: PeriodicScheduler,
    channel: Channel,
}

impl Simulation {
    /// Build every component. All configuration errors surface here,
    /// before any thread starts.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimError> {
        config.validate()?;

        let engine = RaceEngine::new(EngineConfig {
            seed: config.seed,
            total_laps: config.laps,
            drivers: config.drivers,
        })?;
        let scheduler = PeriodicScheduler::new(SchedulerConfig {
            rate_hz: config.rate_hz,
            paced: config.paced,
        })?;

        let channel = match config.transport {
            TransportKind::Queued => {
                if config.capacity <= config.drivers {
                    warn!(
                        "Capacity {} cannot hold one tick of {} frames; the producer will stall",
                        config.capacity, config.drivers
                    );
                }
                Channel::Queued(Arc::new(RingBuffer::new(config.capacity)?))
            }
            TransportKind::LatestOnly => {
                Channel::LatestOnly(Arc::new(SharedState::new(RaceSnapshot::default())))
            }
        };

        Ok(Self {
            config,
            engine,
            scheduler,
            channel,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Handle that interrupts this simulation
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        let sink: Arc<dyn FrameSink> = match &self.channel {
            Channel::Queued(transport) => transport.clone(),
            Channel::LatestOnly(transport) => transport.clone(),
        };
        ShutdownHandle { sink }
    }

    /// Run with the live console on stdout
    pub fn run(self) -> Result<RunSummary, SimError> {
        let renderer =
            ConsoleRenderer::new(io::stdout(), self.config.laps).with_color(self.config.color);
        self.run_with(renderer)
    }

    /// Run both threads to completion with the given renderer
    pub fn run_with<R>(self, renderer: R) -> Result<RunSummary, SimError>
    where
        R: Renderer + Send + 'static,
    {
        let Simulation {
            config,
            engine,
            scheduler,
            channel,
        } = self;

        match channel {
            Channel::Queued(transport) => drive(config, engine, scheduler, transport, renderer),
            Channel::LatestOnly(transport) => {
                drive(config, engine, scheduler, transport, renderer)
            }
        }
    }
}

/// Shuts the transport down when the owning thread exits, panics included
struct ShutdownOnExit<T: FrameSink>(Arc<T>);

impl<T: FrameSink> Drop for ShutdownOnExit<T> {
    fn drop(&mut self) {
        FrameSink::shutdown(&*self.0);
    }
}

fn drive<T, R>(
    config: SimulatorConfig,
    mut engine: RaceEngine,
    scheduler: PeriodicScheduler,
    transport: Arc<T>,
    renderer: R,
) -> Result<RunSummary, SimError>
where
    T: FrameSink + FrameSource + 'static,
    R: Renderer + Send + 'static,
{
    info!(
        "Lights out: seed {}, {} laps, {} drivers, {} transport",
        config.seed,
        config.laps,
        config.drivers,
        config.transport.as_str()
    );
    let started = Instant::now();

    let ui_config = UiConfig {
        drivers: config.drivers,
        render_every: config.render_every,
        clock_driver: 0,
    };
    let source = Arc::clone(&transport);
    let consumer = thread::Builder::new()
        .name("race-consumer".to_string())
        .spawn(move || {
            // A dead consumer must not leave the producer blocked in push
            let _release = ShutdownOnExit(Arc::clone(&source));
            TelemetryUi::new(source, renderer, ui_config).run()
        })?;

    let sink = Arc::clone(&transport);
    let producer = thread::Builder::new()
        .name("race-producer".to_string())
        .spawn(move || {
            let report = engine.run(&sink, &scheduler);
            (report, engine)
        });
    let producer = match producer {
        Ok(handle) => handle,
        Err(e) => {
            FrameSink::shutdown(&*transport);
            let _ = consumer.join();
            return Err(e.into());
        }
    };

    let produced = producer.join();
    if produced.is_err() {
        error!("Producer thread panicked, shutting the transport down");
    }
    // Releases the consumer whichever way the producer ended
    FrameSink::shutdown(&*transport);
    let consumed = consumer.join();
    if consumed.is_err() {
        error!("Consumer thread panicked");
    }

    let (producer_report, engine) =
        produced.map_err(|_| SimError::ThreadPanicked("race-producer"))?;
    let consumer_report = consumed.map_err(|_| SimError::ThreadPanicked("race-consumer"))?;

    let summary = RunSummary {
        seed: config.seed,
        laps: config.laps,
        drivers: config.drivers,
        transport: config.transport,
        outcome: producer_report.outcome,
        ticks: producer_report.ticks,
        race_time_secs: engine.race_time(),
        frames_published: producer_report.frames_published,
        frames_received: consumer_report.frames_received,
        renders: consumer_report.renders,
        scheduler_overruns: producer_report.scheduler.overruns,
        wall_time_ms: started.elapsed().as_millis() as u64,
        classification: classify(engine.cars()),
    };

    info!(
        "Race {:?} after {} ticks: {} frames published, {} received, {} renders",
        summary.outcome,
        summary.ticks,
        summary.frames_published,
        summary.frames_received,
        summary.renders
    );
    Ok(summary)
}

/// Final order from the engine's own state
fn classify(cars: &[CarState]) -> Vec<ClassifiedCar> {
    let leader_distance = cars
        .iter()
        .map(|c| c.distance)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut classification: Vec<ClassifiedCar> = cars
        .iter()
        .map(|car| {
            let info = DriverInfo::by_id(car.driver_id);
            ClassifiedCar {
                position: car.position,
                driver_id: car.driver_id,
                name: info.map_or("?", |i| i.name),
                team: info.map_or("?", |i| i.team),
                laps_completed: car.lap.saturating_sub(1),
                gap_to_leader: (leader_distance - car.distance) / (BASE_SPEED_KMH / 3.6),
                last_lap_time: car.last_lap_time,
                pit_stops: car.pit_stops,
                retired: car.retired,
            }
        })
        .collect();
    classification.sort_by_key(|c| c.position);
    classification
}
