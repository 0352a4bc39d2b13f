//! Lockstep evaluation of [`LANES`] neighbouring pixels.
//!
//! Every lane runs the same arithmetic each step; a [`LaneMask`] records which
//! lanes are still inside the bailout radius. Escaped lanes keep their last
//! in-bounds iterate and stop counting, so they can't overflow into inf/NaN
//! while their neighbours carry on. A group stops as soon as its mask is
//! empty: the slowest lane sets the group's cost, not the budget.
//!
//! Lanes are plain arrays advanced in one loop body, which the compiler is
//! free to lower to vector registers.

use log::trace;

use super::{EscapeResult, Kernel};
use crate::{
    colour, mapper,
    raster::RasterView,
    view::{IterationParameters, ViewState},
};

/// Pixels evaluated together. Must be a power of two no greater than 32.
pub const LANES: usize = 8;

/// One bit per lane; a set bit means the lane hasn't escaped yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneMask(u32);

impl LaneMask {
    pub const ALL: Self = LaneMask(u32::MAX >> (32 - LANES));
    pub const NONE: Self = LaneMask(0);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }

    #[inline]
    fn with(self, lane: usize, active: bool) -> Self {
        LaneMask(self.0 | (active as u32) << lane)
    }

    #[cfg(test)]
    fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// [`LANES`] pixels at a time with a shared per-group early exit.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorKernel;

impl VectorKernel {
    /// Iterates every lane of one group in lockstep.
    ///
    /// `re` holds each lane's real coordinate, `im` is shared by the row. Lane
    /// `i` of the result equals `ScalarKernel::evaluate((re[i], im), ..)`.
    #[inline]
    pub fn evaluate_group(
        re: [f32; LANES],
        im: f32,
        bailout_sq: f32,
        iteration_budget: u32,
    ) -> [EscapeResult; LANES] {
        let mut x = re;
        let mut y = [im; LANES];
        let mut counters = [0u32; LANES];
        let mut active = LaneMask::ALL;

        for _ in 0..iteration_budget {
            let mut still_active = LaneMask::NONE;
            for lane in 0..LANES {
                let next_x = x[lane] * x[lane] - y[lane] * y[lane] + re[lane];
                let next_y = 2.0 * x[lane] * y[lane] + im;

                // Written as `!(a > b)` so NaN behaves as in the scalar loop.
                let magnitude_sq = next_x * next_x + next_y * next_y;
                let inside = active.contains(lane) && !(magnitude_sq > bailout_sq);
                if inside {
                    x[lane] = next_x;
                    y[lane] = next_y;
                }
                counters[lane] += inside as u32;
                still_active = still_active.with(lane, inside);
            }

            active = still_active;
            if active.is_empty() {
                break;
            }
        }

        counters.map(|counter| EscapeResult::from_counter(counter, iteration_budget))
    }
}

impl Kernel for VectorKernel {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn render_frame(&self, raster: &mut RasterView, params: IterationParameters, view: ViewState) {
        trace!("begin vector render_frame");

        let size = raster.size();
        let dx = mapper::pixel_delta(size, &view);
        let offsets: [f32; LANES] = std::array::from_fn(|lane| lane as f32 * dx);

        for h in 0..size.height {
            let im = mapper::row_im(h, size, &view);
            let row = raster.row_mut(h);

            for (group, cells) in row.chunks_mut(LANES).enumerate() {
                let re0 = mapper::column_re((group * LANES) as u32, size, &view);
                let re = offsets.map(|offset| re0 + offset);

                let results =
                    Self::evaluate_group(re, im, params.bailout_sq, params.iteration_budget);

                // The last chunk of a row may be short; its extra lanes are dropped.
                for (cell, result) in cells.iter_mut().zip(results) {
                    *cell = colour::cell(result);
                }
            }
        }

        trace!("end vector render_frame");
    }
}
