//! Telemetry UI (Consumer)
//!
//! Drains frames from a [`FrameSource`](race_telemetry::FrameSource),
//! keeps the latest frame per car, and renders at a reduced cadence:
//! - `LatestTable`: consumer-owned per-car cache
//! - `TelemetryUi`: the consumer loop
//! - `ConsoleRenderer`: live status line and final leaderboard

mod console;
mod consumer;
mod table;

pub use console::ConsoleRenderer;
pub use consumer::{ConsumerReport, RenderContext, Renderer, TelemetryUi, UiConfig};
pub use table::LatestTable;
