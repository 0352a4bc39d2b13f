//! Frame driver: owns the raster and runs the selected kernel once per frame.

use std::time::{Duration, Instant};

use log::{info, trace};

use crate::{
    kernel::Kernel,
    raster::Raster,
    screen,
    view::{IterationParameters, ViewState},
};

/// How often the frame rate is reported.
pub const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Measures frame times and periodically logs the frame rate.
pub struct FrameClock {
    last_frame: Instant,
    report_start: Instant,
    frames_since_report: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            report_start: now,
            frames_since_report: 0,
        }
    }

    /// Marks the end of a frame; returns seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now()).0
    }

    /// Like [`FrameClock::tick`], also returning the frame rate if a report was due.
    pub fn tick_at(&mut self, now: Instant) -> (f32, Option<f32>) {
        let elapsed = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames_since_report += 1;

        let window = now.saturating_duration_since(self.report_start);
        if window < FPS_REPORT_INTERVAL {
            return (elapsed, None);
        }

        let fps = self.frames_since_report as f32 / window.as_secs_f32();
        info!("FPS: {:.1}", fps);
        self.report_start = now;
        self.frames_since_report = 0;
        (elapsed, Some(fps))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameDriver {
    kernel: Box<dyn Kernel>,
    raster: Raster,
    params: IterationParameters,
    pub view: ViewState,
    stale: bool,
}

impl FrameDriver {
    pub fn new(kernel: Box<dyn Kernel>, size: screen::Size, params: IterationParameters) -> Self {
        info!(
            "{} kernel, {}x{}, bailout_sq = {}, budget = {}",
            kernel.name(),
            size.width,
            size.height,
            params.bailout_sq,
            params.iteration_budget
        );
        Self {
            kernel,
            raster: Raster::new(size),
            params,
            view: ViewState::default(),
            stale: true,
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn resize(&mut self, size: screen::Size) {
        self.raster.resize(size);
        self.stale = true;
    }

    /// Marks the raster as out of date with `view`.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Renders only if the view or size changed since the last render.
    pub fn render_if_stale(&mut self) -> Option<Duration> {
        if !self.stale {
            return None;
        }
        Some(self.render())
    }

    /// Renders the current view into the raster. Returns how long the kernel took.
    ///
    /// A zero-sized raster (minimised window) is left alone.
    pub fn render(&mut self) -> Duration {
        if self.raster.size().is_empty() {
            return Duration::ZERO;
        }

        let started = Instant::now();
        {
            let mut view = self.raster.lock();
            self.kernel.render_frame(&mut view, self.params, self.view);
        }
        let took = started.elapsed();
        self.stale = false;
        trace!("{} kernel took {:?}", self.kernel.name(), took);
        took
    }

    /// Renders `frames` frames of the current view and logs the mean frame time.
    pub fn bench(&mut self, frames: u32) -> Duration {
        let total: Duration = (0..frames).map(|_| self.render()).sum();
        let mean = total / frames.max(1);
        info!(
            "{} kernel: {} frames, mean {:?} ({:.1} FPS)",
            self.kernel.name(),
            frames,
            mean,
            1.0 / mean.as_secs_f64().max(f64::EPSILON)
        );
        mean
    }
}
