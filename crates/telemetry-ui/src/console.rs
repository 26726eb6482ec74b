//! Console renderer

use crate::{LatestTable, RenderContext, Renderer};
use race_telemetry::{DriverInfo, TelemetryFrame};
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\x1b[K";

/// Writes a one-line live status and, at the end, the full leaderboard
pub struct ConsoleRenderer<W: Write> {
    out: W,
    total_laps: u16,
    color: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Create a renderer writing to `out`
    pub fn new(out: W, total_laps: u16) -> Self {
        Self {
            out,
            total_laps,
            color: true,
        }
    }

    /// Enable or disable ANSI team colours
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn name(&self, frame: &TelemetryFrame) -> String {
        match DriverInfo::by_id(frame.driver_id) {
            Some(info) if self.color => format!("{}{}{}", info.team_color, info.name, RESET),
            Some(info) => info.name.to_string(),
            None => format!("Car {}", frame.driver_id),
        }
    }

    /// Live line, overwritten in place
    pub fn status_line(&self, table: &LatestTable) -> String {
        let Some(leader) = table.leader() else {
            return format!("\r{}Waiting for telemetry...", CLEAR_LINE);
        };

        let mut line = format!(
            "\r{}[{:7.2}s] Leader: {} {:5.1} km/h  Lap {}/{}  S{}",
            CLEAR_LINE,
            leader.race_time_secs(),
            self.name(leader),
            leader.speed,
            leader.lap.min(self.total_laps),
            self.total_laps,
            leader.sector + 1,
        );
        if let Some(last) = table.last_place() {
            let _ = write!(line, "  | Last: {} Lap {}", self.name(last), last.lap);
        }
        line
    }

    /// Full leaderboard, one row per reported car
    pub fn leaderboard(&self, table: &LatestTable) -> String {
        let mut board = String::from("\nFinal Classification\n");
        let _ = writeln!(
            board,
            "{:<4} {:<16} {:<18} {:>4} {:>10} {:>10}",
            "Pos", "Driver", "Team", "Lap", "Gap", "Last lap"
        );

        for frame in table.standings() {
            let team = DriverInfo::by_id(frame.driver_id).map_or("", |info| info.team);
            let gap = if frame.position == 1 {
                "Leader".to_string()
            } else {
                format!("+{:.3}s", frame.gap_to_leader)
            };
            let last_lap = if frame.last_lap_time > 0.0 {
                format!("{:.3}s", frame.last_lap_time)
            } else {
                "--".to_string()
            };
            let marker = if frame.is_retired() {
                " DNF"
            } else if frame.in_pits() {
                " PIT"
            } else {
                ""
            };

            // Pad the plain name so colour escapes do not skew the columns
            let plain = DriverInfo::by_id(frame.driver_id).map_or("?", |info| info.name);
            let padding = 16usize.saturating_sub(plain.chars().count());
            let _ = writeln!(
                board,
                "P{:<3} {}{} {:<18} {:>4} {:>10} {:>10}{}",
                frame.position,
                self.name(frame),
                " ".repeat(padding),
                team,
                frame.lap,
                gap,
                last_lap,
                marker
            );
        }
        board
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, table: &LatestTable, ctx: &RenderContext) {
        let mut text = self.status_line(table);
        if ctx.is_final {
            text.push('\n');
            text.push_str(&self.leaderboard(table));
        }

        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Render {} failed: {}", ctx.render_index, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_telemetry::flags;
    use std::io;

    fn table() -> LatestTable {
        let mut table = LatestTable::new(3);

        let mut leader = TelemetryFrame::new(0, 12_340);
        leader.position = 1;
        leader.lap = 2;
        leader.speed = 198.4;
        leader.sector = 1;
        leader.last_lap_time = 91.25;
        table.update(leader);

        let mut second = TelemetryFrame::new(2, 12_340);
        second.position = 2;
        second.lap = 2;
        second.gap_to_leader = 1.5;
        second.flags = flags::IN_PITS;
        table.update(second);

        let mut third = TelemetryFrame::new(1, 12_340);
        third.position = 3;
        third.lap = 1;
        third.flags = flags::DNF;
        table.update(third);
        table
    }

    fn final_ctx() -> RenderContext {
        RenderContext {
            frames_received: 3,
            render_index: 0,
            is_final: true,
        }
    }

    #[test]
    fn test_status_line() {
        let renderer = ConsoleRenderer::new(Vec::new(), 5).with_color(false);
        let line = renderer.status_line(&table());

        assert!(line.starts_with('\r'));
        assert!(line.contains("12.34s"));
        assert!(line.contains("Leader: M. Verstappen"));
        assert!(line.contains("198.4 km/h"));
        assert!(line.contains("Lap 2/5"));
        assert!(line.contains("S2"));
        assert!(line.contains("Last: Y. Tsunoda Lap 1"));
    }

    #[test]
    fn test_status_line_before_any_frame() {
        let renderer = ConsoleRenderer::new(Vec::new(), 5);
        assert!(renderer
            .status_line(&LatestTable::new(3))
            .contains("Waiting for telemetry"));
    }

    #[test]
    fn test_final_render_prints_leaderboard() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), 5).with_color(false);
        renderer.render(&table(), &final_ctx());
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        let rows: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with('P') && !l.starts_with("Pos"))
            .collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("M. Verstappen") && rows[0].contains("Leader"));
        assert!(rows[0].contains("91.250s"));
        assert!(rows[1].contains("C. Leclerc") && rows[1].contains("+1.500s"));
        assert!(rows[1].ends_with("PIT"));
        assert!(rows[2].contains("Y. Tsunoda") && rows[2].ends_with("DNF"));
    }

    #[test]
    fn test_team_colours() {
        let renderer = ConsoleRenderer::new(Vec::new(), 5);
        let board = renderer.leaderboard(&table());
        let info = DriverInfo::by_id(0).unwrap();
        assert!(board.contains(&format!("{}{}{}", info.team_color, info.name, RESET)));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_errors_are_swallowed() {
        let mut renderer = ConsoleRenderer::new(BrokenPipe, 5);
        renderer.render(&table(), &final_ctx());
    }
}
