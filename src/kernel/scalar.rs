use log::trace;

use super::{EscapeResult, Kernel};
use crate::{
    colour, mapper,
    point::Complex,
    raster::RasterView,
    view::{IterationParameters, ViewState},
};

/// One point at a time, each stopping as soon as it escapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarKernel;

impl ScalarKernel {
    /// Iterates `z' = z² + c` from `z = c` for up to `iteration_budget` steps.
    #[inline]
    pub fn evaluate(c: Complex, bailout_sq: f32, iteration_budget: u32) -> EscapeResult {
        let (mut x, mut y) = (c.re, c.im);
        for iteration in 0..iteration_budget {
            let next_x = x * x - y * y + c.re;
            y = 2.0 * x * y + c.im;
            x = next_x;

            if x * x + y * y > bailout_sq {
                return EscapeResult::Escaped {
                    iterations: iteration,
                };
            }
        }
        EscapeResult::Bounded
    }
}

impl Kernel for ScalarKernel {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn render_frame(&self, raster: &mut RasterView, params: IterationParameters, view: ViewState) {
        trace!("begin scalar render_frame");

        let size = raster.size();
        for h in 0..size.height {
            let row = raster.row_mut(h);
            for (w, cell) in (0..size.width).zip(row.iter_mut()) {
                let c = mapper::map(w, h, size, &view);
                *cell = colour::cell(Self::evaluate(
                    c,
                    params.bailout_sq,
                    params.iteration_budget,
                ));
            }
        }

        trace!("end scalar render_frame");
    }
}
