//! Per-Car Physics
//!
//! Deliberately simple: constant-ish pace scaled by car, driver and tire
//! wear, plus pit stops, random retirements and safety car speed caps.

use crate::profiles::{CarProfile, DriverProfile};
use race_telemetry::{SECTOR_COUNT, TRACK_LENGTH};
use rand::Rng;

/// Physics update rate
pub const SIMULATION_HZ: f32 = 50.0;
/// Seconds per tick
pub const DT: f32 = 1.0 / SIMULATION_HZ;
/// Milliseconds per tick
pub const TICK_MS: u32 = 20;

/// Nominal speed of a perfect car and driver on fresh tires
pub const BASE_SPEED_KMH: f32 = 200.0;
/// Floor for a running car's speed
pub const MIN_SPEED_KMH: f32 = 50.0;
/// Distance between consecutive grid slots
pub const GRID_SPACING_M: f32 = 25.0;

/// Tire wear per second before driver modifiers
pub const TIRE_WEAR_BASE_RATE: f32 = 0.004;
/// Shortest possible stationary pit stop
pub const PIT_STOP_BASE_DURATION: f32 = 2.0;

/// Retirement probability per second for a car with zero reliability
pub const RETIREMENT_RATE: f32 = 0.0004;
/// Safety car period after a retirement
pub const SAFETY_CAR_DURATION: f32 = 10.0;
/// Speed cap while the safety car is out
pub const SAFETY_CAR_SPEED_KMH: f32 = 120.0;

/// Result of advancing one car by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarEvent {
    None,
    EnteredPits,
    ExitedPits,
    CompletedLap,
}

/// Mutable per-car race state
#[derive(Debug, Clone, PartialEq)]
pub struct CarState {
    pub driver_id: u8,
    pub distance: f32,
    pub speed: f32,
    pub lap: u16,
    pub position: u8,
    pub sector: u8,
    /// 0.0-1.0
    pub tire_wear: f32,
    pub pit_threshold: f32,
    pub in_pits: bool,
    pub pit_timer: f32,
    pub pit_stops: u16,
    pub retired: bool,
    pub sector_times: [f32; SECTOR_COUNT],
    pub last_lap_time: f32,
    sector_start: f32,
    lap_start: f32,
}

impl CarState {
    /// Place a car on its grid slot
    pub fn on_grid(driver_id: u8, driver: &DriverProfile) -> Self {
        // Managed tires and a taste for risk both push the stop later
        let pit_threshold = (0.65
            + driver.tire_management * 0.25
            + (driver.risk_tolerance - 0.5) * 0.15)
            .clamp(0.6, 0.95);

        Self {
            driver_id,
            distance: -GRID_SPACING_M * driver_id as f32,
            speed: 0.0,
            lap: 1,
            position: driver_id + 1,
            sector: 0,
            tire_wear: 0.0,
            pit_threshold,
            in_pits: false,
            pit_timer: 0.0,
            pit_stops: 0,
            retired: false,
            sector_times: [0.0; SECTOR_COUNT],
            last_lap_time: 0.0,
            sector_start: 0.0,
            lap_start: 0.0,
        }
    }

    /// Flat-out speed for this car and driver on fresh tires
    pub fn top_speed(car: &CarProfile, driver: &DriverProfile) -> f32 {
        let driver_skill = 0.80 + driver.consistency * 0.25;
        BASE_SPEED_KMH * car.engine_power * driver_skill
    }

    /// Roll for a mechanical failure this tick
    pub fn roll_retirement<R: Rng>(car: &CarProfile, rng: &mut R) -> bool {
        let probability = (1.0 - car.reliability) * RETIREMENT_RATE * DT;
        rng.gen::<f32>() < probability
    }

    /// Stop the car for the rest of the race
    pub fn retire(&mut self) {
        self.retired = true;
        self.in_pits = false;
        self.speed = 0.0;
    }

    /// Advance one tick. `race_time` is the time at the end of the tick.
    pub fn advance<R: Rng>(
        &mut self,
        car: &CarProfile,
        driver: &DriverProfile,
        safety_car: bool,
        race_time: f32,
        rng: &mut R,
    ) -> CarEvent {
        if self.retired {
            self.speed = 0.0;
            return CarEvent::None;
        }

        let mut event = CarEvent::None;
        if self.in_pits {
            self.speed = 0.0;
            self.pit_timer -= DT;
            if self.pit_timer <= 0.0 {
                self.in_pits = false;
                self.tire_wear = 0.0;
                self.pit_stops += 1;
                event = CarEvent::ExitedPits;
            }
        } else if self.tire_wear >= self.pit_threshold {
            self.in_pits = true;
            self.speed = 0.0;
            self.pit_timer = PIT_STOP_BASE_DURATION + (1.0 - car.reliability) * 0.5;
            event = CarEvent::EnteredPits;
        } else {
            self.drive(car, driver, safety_car, rng);
        }

        if self.update_timing(race_time) {
            event = CarEvent::CompletedLap;
        }
        event
    }

    fn drive<R: Rng>(
        &mut self,
        car: &CarProfile,
        driver: &DriverProfile,
        safety_car: bool,
        rng: &mut R,
    ) {
        let wear_rate = TIRE_WEAR_BASE_RATE
            * (1.0 + driver.aggression * 0.5)
            * (1.0 - driver.tire_management * 0.3);
        self.tire_wear = (self.tire_wear + wear_rate * DT).min(1.0);

        // Worn tires cost up to 30% of pace
        let tire_factor = 1.0 - self.tire_wear * 0.3;
        let variation = rng.gen_range(-5.0f32..5.0) * (1.0 - driver.consistency);

        let mut speed = (Self::top_speed(car, driver) * tire_factor + variation).max(MIN_SPEED_KMH);
        if safety_car {
            speed = speed.min(SAFETY_CAR_SPEED_KMH);
        }
        self.speed = speed;
        self.distance += speed / 3.6 * DT;
    }

    /// Update sector/lap timing; true when a lap was completed this tick
    fn update_timing(&mut self, race_time: f32) -> bool {
        if self.distance >= TRACK_LENGTH * self.lap as f32 {
            self.last_lap_time = race_time - self.lap_start;
            self.lap += 1;
            self.lap_start = race_time;
            self.sector_start = race_time;
            self.sector_times = [0.0; SECTOR_COUNT];
            self.sector = 0;
            return true;
        }

        let sector = sector_of(self.distance, self.lap);
        if sector != self.sector {
            self.sector_times[self.sector as usize] = race_time - self.sector_start;
            self.sector_start = race_time;
            self.sector = sector;
        }
        self.sector_times[self.sector as usize] = race_time - self.sector_start;
        false
    }
}

/// Sector index (0-2) for a distance on the given lap
pub fn sector_of(distance: f32, lap: u16) -> u8 {
    let lap_distance = distance - TRACK_LENGTH * (lap as f32 - 1.0);
    let sector_length = TRACK_LENGTH / SECTOR_COUNT as f32;

    if lap_distance < sector_length {
        0
    } else if lap_distance < sector_length * 2.0 {
        1
    } else {
        2
    }
}
