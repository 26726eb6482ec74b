//! 2025 Driver Roster
//!
//! Static names and team colours, indexed by driver id. Two cars per team,
//! teams ordered from front to back of the grid.

use crate::NUM_DRIVERS;

/// Driver and team display data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: &'static str,
    pub team: &'static str,
    /// ANSI 256-colour escape for the team
    pub team_color: &'static str,
}

mod team_colors {
    pub const RED_BULL: &str = "\x1b[38;5;18m";
    pub const FERRARI: &str = "\x1b[38;5;196m";
    pub const MCLAREN: &str = "\x1b[38;5;208m";
    pub const MERCEDES: &str = "\x1b[38;5;50m";
    pub const ASTON_MARTIN: &str = "\x1b[38;5;34m";
    pub const ALPINE: &str = "\x1b[38;5;201m";
    pub const RACING_BULLS: &str = "\x1b[38;5;27m";
    pub const HAAS: &str = "\x1b[38;5;245m";
    pub const WILLIAMS: &str = "\x1b[38;5;33m";
    pub const KICK_SAUBER: &str = "\x1b[38;5;46m";
}

const fn driver(name: &'static str, team: &'static str, team_color: &'static str) -> DriverInfo {
    DriverInfo {
        name,
        team,
        team_color,
    }
}

/// Driver roster, indexed by driver id
pub const DRIVER_ROSTER: [DriverInfo; NUM_DRIVERS] = [
    driver("M. Verstappen", "Red Bull Racing", team_colors::RED_BULL),
    driver("Y. Tsunoda", "Red Bull Racing", team_colors::RED_BULL),
    driver("C. Leclerc", "Ferrari", team_colors::FERRARI),
    driver("L. Hamilton", "Ferrari", team_colors::FERRARI),
    driver("L. Norris", "McLaren", team_colors::MCLAREN),
    driver("O. Piastri", "McLaren", team_colors::MCLAREN),
    driver("G. Russell", "Mercedes", team_colors::MERCEDES),
    driver("A. Antonelli", "Mercedes", team_colors::MERCEDES),
    driver("F. Alonso", "Aston Martin", team_colors::ASTON_MARTIN),
    driver("L. Stroll", "Aston Martin", team_colors::ASTON_MARTIN),
    driver("P. Gasly", "Alpine", team_colors::ALPINE),
    driver("F. Colapinto", "Alpine", team_colors::ALPINE),
    driver("L. Lawson", "Racing Bulls", team_colors::RACING_BULLS),
    driver("I. Hadjar", "Racing Bulls", team_colors::RACING_BULLS),
    driver("E. Ocon", "Haas F1 Team", team_colors::HAAS),
    driver("O. Bearman", "Haas F1 Team", team_colors::HAAS),
    driver("A. Albon", "Williams Racing", team_colors::WILLIAMS),
    driver("C. Sainz", "Williams Racing", team_colors::WILLIAMS),
    driver("N. Hulkenberg", "Kick Sauber", team_colors::KICK_SAUBER),
    driver("G. Bortoleto", "Kick Sauber", team_colors::KICK_SAUBER),
];

impl DriverInfo {
    /// Look up a driver by id
    pub fn by_id(driver_id: u8) -> Option<&'static DriverInfo> {
        DRIVER_ROSTER.get(driver_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_drivers_per_team() {
        for pair in DRIVER_ROSTER.chunks(2) {
            assert_eq!(pair[0].team, pair[1].team);
            assert_eq!(pair[0].team_color, pair[1].team_color);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(DriverInfo::by_id(2).map(|d| d.team), Some("Ferrari"));
        assert!(DriverInfo::by_id(20).is_none());
    }
}
