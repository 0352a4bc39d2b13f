//! Command-line configuration.

use anyhow::{bail, ensure};
use clap::Parser;

use crate::{
    input::ControlMode,
    kernel::KernelKind,
    screen,
    view::{IterationParameters, DEFAULT_BAILOUT_SQ, DEFAULT_ITERATION_BUDGET},
};

/// Interactive Mandelbrot viewer with scalar and lockstep-vector kernels.
#[derive(Parser, Debug, Clone)]
#[command(name = "simd-mandelbrot", version, long_about = None)]
pub struct Config {
    /// Escape-time kernel to render with
    #[arg(long, value_enum, default_value_t = KernelKind::default())]
    pub kernel: KernelKind,

    /// Iteration budget per pixel
    #[arg(long, short = 'i', default_value_t = DEFAULT_ITERATION_BUDGET)]
    pub iterations: u32,

    /// Squared bailout threshold (already squared; 4 is the usual radius of 2)
    #[arg(long, value_name = "R2")]
    pub bailout_sq: Option<f32>,

    /// Linear bailout radius, squared before use
    #[arg(long, value_name = "R", conflicts_with = "bailout_sq")]
    pub radius: Option<f32>,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Pan and zoom while keys are held, scaled by frame time
    #[arg(long)]
    pub continuous: bool,

    /// Render this many frames without a window, log timings and exit
    #[arg(long, value_name = "FRAMES")]
    pub bench: Option<u32>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.iterations > 0, "--iterations must be at least 1");
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be at least 1x1, got {}x{}",
            self.width,
            self.height
        );
        if let Some(frames) = self.bench {
            ensure!(frames > 0, "--bench needs at least one frame");
        }
        Ok(())
    }

    pub fn iteration_parameters(&self) -> anyhow::Result<IterationParameters> {
        self.validate()?;
        let bailout_sq = match (self.bailout_sq, self.radius) {
            (Some(_), Some(_)) => bail!("--bailout-sq and --radius are mutually exclusive"),
            (Some(bailout_sq), None) => bailout_sq,
            (None, Some(radius)) => radius * radius,
            (None, None) => DEFAULT_BAILOUT_SQ,
        };
        ensure!(
            bailout_sq.is_finite() && bailout_sq > 0.0,
            "bailout threshold must be positive and finite, got {bailout_sq}"
        );
        Ok(IterationParameters::new(bailout_sq, self.iterations))
    }

    pub fn size(&self) -> screen::Size {
        screen::Size::new(self.width, self.height)
    }

    pub fn control_mode(&self) -> ControlMode {
        if self.continuous {
            ControlMode::Continuous
        } else {
            ControlMode::Discrete
        }
    }
}
