//! Car and Driver Profiles
//!
//! Performance coefficients for the 2025 grid. Values are normalised to
//! 0.0-1.0; higher is better except `aggression` and `risk_tolerance`,
//! which trade tire life for pace.

use race_telemetry::NUM_DRIVERS;

/// Team car performance (shared by both cars of a team)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarProfile {
    /// Scales the car's top speed
    pub engine_power: f32,
    /// Lowers retirement odds and speeds up pit stops
    pub reliability: f32,
}

/// Individual driver characteristics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverProfile {
    /// Pace at the cost of tire wear
    pub aggression: f32,
    /// Extracts more of the car and varies less lap to lap
    pub consistency: f32,
    /// Slows tire wear and lets the driver stay out longer
    pub tire_management: f32,
    /// Pushes the pit threshold later
    pub risk_tolerance: f32,
}

const fn car(engine_power: f32, reliability: f32) -> CarProfile {
    CarProfile {
        engine_power,
        reliability,
    }
}

const fn driver(
    aggression: f32,
    consistency: f32,
    tire_management: f32,
    risk_tolerance: f32,
) -> DriverProfile {
    DriverProfile {
        aggression,
        consistency,
        tire_management,
        risk_tolerance,
    }
}

/// Car profiles by team, front of the grid first
pub const TEAM_PROFILES: [CarProfile; NUM_DRIVERS / 2] = [
    car(0.95, 0.94), // Red Bull Racing
    car(0.93, 0.88), // Ferrari
    car(0.91, 0.92), // McLaren
    car(0.94, 0.93), // Mercedes
    car(0.87, 0.88), // Aston Martin
    car(0.84, 0.82), // Alpine
    car(0.83, 0.86), // Racing Bulls
    car(0.80, 0.84), // Haas
    car(0.78, 0.85), // Williams
    car(0.76, 0.83), // Kick Sauber
];

/// Driver profiles, indexed by driver id
pub const DRIVER_PROFILES: [DriverProfile; NUM_DRIVERS] = [
    driver(0.85, 0.97, 0.90, 0.75),
    driver(0.78, 0.82, 0.75, 0.68),
    driver(0.92, 0.95, 0.87, 0.85),
    driver(0.76, 0.88, 0.82, 0.62),
    driver(0.84, 0.94, 0.88, 0.72),
    driver(0.72, 0.91, 0.86, 0.65),
    driver(0.88, 0.91, 0.84, 0.78),
    driver(0.80, 0.93, 0.89, 0.70),
    driver(0.86, 0.89, 0.83, 0.74),
    driver(0.74, 0.85, 0.80, 0.66),
    driver(0.89, 0.84, 0.79, 0.82),
    driver(0.81, 0.86, 0.81, 0.71),
    driver(0.87, 0.79, 0.76, 0.80),
    driver(0.83, 0.82, 0.78, 0.75),
    driver(0.77, 0.83, 0.82, 0.68),
    driver(0.75, 0.81, 0.80, 0.67),
    driver(0.82, 0.80, 0.77, 0.76),
    driver(0.79, 0.78, 0.75, 0.73),
    driver(0.80, 0.77, 0.74, 0.77),
    driver(0.76, 0.76, 0.73, 0.72),
];

/// Car profile for a driver (two drivers per team)
pub fn car_profile(driver_id: usize) -> CarProfile {
    TEAM_PROFILES[driver_id / 2]
}

/// Driver profile by id
pub fn driver_profile(driver_id: usize) -> DriverProfile {
    DRIVER_PROFILES[driver_id]
}
