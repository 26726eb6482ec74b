//! Full races through both threads, unpaced

use race_telemetry::TelemetryFrame;
use simulator::{RunSummary, Simulation, SimulatorConfig, TransportKind};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use telemetry_ui::{LatestTable, RenderContext, Renderer};

/// Folds every rendered table into a running digest
#[derive(Clone, Default)]
struct Digest {
    state: Arc<Mutex<(u64, u64)>>,
}

impl Digest {
    fn value(&self) -> (u64, u64) {
        *self.state.lock().unwrap()
    }
}

fn hash_frame(frame: &TelemetryFrame, hasher: &mut DefaultHasher) {
    (frame.timestamp_ms, frame.driver_id, frame.position, frame.lap).hash(hasher);
    (frame.sector, frame.flags).hash(hasher);
    for value in [
        frame.speed,
        frame.distance,
        frame.throttle,
        frame.tire_wear,
        frame.last_lap_time,
        frame.gap_to_leader,
    ] {
        value.to_bits().hash(hasher);
    }
    for time in frame.sector_times {
        time.to_bits().hash(hasher);
    }
}

impl Renderer for Digest {
    fn render(&mut self, table: &LatestTable, _ctx: &RenderContext) {
        let mut state = self.state.lock().unwrap();
        let mut hasher = DefaultHasher::new();
        state.0.hash(&mut hasher);
        for id in 0..table.len() {
            if let Some(frame) = table.get(id) {
                hash_frame(frame, &mut hasher);
            }
        }
        state.0 = hasher.finish();
        state.1 += 1;
    }
}

fn race(seed: u64, transport: TransportKind) -> (RunSummary, (u64, u64)) {
    let config = SimulatorConfig {
        seed,
        laps: 5,
        drivers: 20,
        transport,
        render_every: 1,
        paced: false,
        ..Default::default()
    };
    let digest = Digest::default();
    let summary = Simulation::new(config)
        .unwrap()
        .run_with(digest.clone())
        .unwrap();
    (summary, digest.value())
}

#[test]
fn test_full_race_delivers_every_frame() {
    let (summary, (_, renders)) = race(42, TransportKind::Queued);

    assert!(summary.finished());
    assert_eq!(summary.frames_published, summary.ticks * 20);
    assert_eq!(summary.frames_received, summary.frames_published);
    assert_eq!(summary.renders, renders);
    // One render per tick plus the final one
    assert_eq!(summary.renders, summary.ticks + 1);

    let winner = &summary.classification[0];
    assert_eq!(winner.position, 1);
    assert_eq!(winner.laps_completed, 5);
    assert_eq!(winner.gap_to_leader, 0.0);
    // Five laps of 5 km at roughly 200 km/h
    assert!(summary.race_time_secs > 400.0 && summary.race_time_secs < 650.0);
    // Unpaced, so the run ends long before the simulated race time
    assert!(summary.wall_time_ms < 60_000, "took {}ms", summary.wall_time_ms);
}

#[test]
fn test_same_seed_replays_identically() {
    let (first, first_digest) = race(42, TransportKind::Queued);
    let (second, second_digest) = race(42, TransportKind::Queued);

    assert_eq!(first.ticks, second.ticks);
    assert_eq!(first_digest, second_digest);
    assert_eq!(first.classification, second.classification);
}

#[test]
fn test_different_seed_different_race() {
    let (first, first_digest) = race(42, TransportKind::Queued);
    let (other, other_digest) = race(43, TransportKind::Queued);

    assert_ne!(first_digest, other_digest);
    assert!(first.ticks != other.ticks || first.classification != other.classification);
}

#[test]
fn test_latest_only_reaches_same_result() {
    let (latest, _) = race(42, TransportKind::LatestOnly);
    let (reference, _) = race(42, TransportKind::Queued);

    // The consumer may skip ticks, the race itself may not change
    assert!(latest.finished());
    assert!(latest.frames_received <= latest.frames_published);
    assert_eq!(latest.ticks, reference.ticks);
    assert_eq!(latest.classification, reference.classification);
}
