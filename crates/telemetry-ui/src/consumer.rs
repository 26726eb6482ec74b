//! Consumer Loop

use crate::LatestTable;
use race_telemetry::{FrameSource, NUM_DRIVERS, TelemetryFrame};
use tracing::{debug, info, warn};

/// Consumer configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Size of the latest table
    pub drivers: usize,
    /// Render once every this many clock-driver frames (default: 5)
    pub render_every: u32,
    /// Driver whose frames pace rendering (default: 0)
    pub clock_driver: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            drivers: NUM_DRIVERS,
            render_every: 5,
            clock_driver: 0,
        }
    }
}

/// What a renderer is told alongside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Frames received so far
    pub frames_received: u64,
    /// Zero-based count of renders before this one
    pub render_index: u64,
    /// Last render, after the transport drained
    pub is_final: bool,
}

/// Draws the latest table somewhere.
///
/// Called from the consumer thread; a slow render backs up the transport.
pub trait Renderer {
    fn render(&mut self, table: &LatestTable, ctx: &RenderContext);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, table: &LatestTable, ctx: &RenderContext) {
        (**self).render(table, ctx)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, table: &LatestTable, ctx: &RenderContext) {
        (**self).render(table, ctx)
    }
}

/// Summary of a consumer run
#[derive(Debug, Clone)]
pub struct ConsumerReport {
    pub frames_received: u64,
    pub renders: u64,
    /// Table as of the final render
    pub table: LatestTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiState {
    Running,
    Drained,
}

/// The consumer: drains a source into a latest table and renders it
pub struct TelemetryUi<S, R> {
    source: S,
    renderer: R,
    config: UiConfig,
    table: LatestTable,
    frames_received: u64,
    clock_frames: u64,
    renders: u64,
}

impl<S: FrameSource, R: Renderer> TelemetryUi<S, R> {
    /// Create a new consumer
    pub fn new(source: S, renderer: R, mut config: UiConfig) -> Self {
        if config.render_every == 0 {
            warn!("render_every of 0 is not allowed, rendering every clock frame");
            config.render_every = 1;
        }

        Self {
            table: LatestTable::new(config.drivers),
            source,
            renderer,
            config,
            frames_received: 0,
            clock_frames: 0,
            renders: 0,
        }
    }

    /// Consume until the source is shut down and drained, then render once more
    pub fn run(mut self) -> ConsumerReport {
        info!(
            "Consumer started: {} drivers, render every {} clock frames",
            self.config.drivers, self.config.render_every
        );

        let mut state = UiState::Running;
        let mut batch = Vec::with_capacity(self.config.drivers);

        loop {
            match state {
                UiState::Running => {
                    batch.clear();
                    if self.source.next_frames(&mut batch).is_err() {
                        debug!("Source drained after {} frames", self.frames_received);
                        state = UiState::Drained;
                        continue;
                    }
                    for frame in &batch {
                        self.ingest(*frame);
                    }
                }
                UiState::Drained => {
                    self.render(true);
                    break;
                }
            }
        }

        info!(
            "Consumer finished: {} frames, {} renders",
            self.frames_received, self.renders
        );

        ConsumerReport {
            frames_received: self.frames_received,
            renders: self.renders,
            table: self.table,
        }
    }

    fn ingest(&mut self, frame: TelemetryFrame) {
        self.frames_received += 1;
        self.table.update(frame);

        if frame.driver_id == self.config.clock_driver {
            self.clock_frames += 1;
            if self.clock_frames % u64::from(self.config.render_every) == 0 {
                self.render(false);
            }
        }
    }

    fn render(&mut self, is_final: bool) {
        let ctx = RenderContext {
            frames_received: self.frames_received,
            render_index: self.renders,
            is_final,
        };
        self.renderer.render(&self.table, &ctx);
        self.renders += 1;

        metrics::counter!("ui.renders").increment(1);
        metrics::gauge!("ring_buffer.depth").set(self.source.backlog() as f64);
    }
}
