//! Escape-time kernels.
//!
//! A kernel fills every cell of a [`RasterView`] with [`colour::BOUNDED_CELL`]
//! or [`colour::ESCAPED_CELL`]. [`ScalarKernel`] evaluates one point at a time
//! and stops each point as soon as it escapes; [`VectorKernel`] evaluates
//! [`vector::LANES`] neighbouring points in lockstep and stops a group once
//! every lane has escaped. Both read coordinates from [`crate::mapper`] and
//! classify identically for identical coordinates.
//!
//! [`colour::BOUNDED_CELL`]: crate::colour::BOUNDED_CELL
//! [`colour::ESCAPED_CELL`]: crate::colour::ESCAPED_CELL

pub mod scalar;
pub mod vector;

pub use scalar::ScalarKernel;
pub use vector::VectorKernel;

use crate::{
    raster::RasterView,
    view::{IterationParameters, ViewState},
};

/// Outcome of iterating one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeResult {
    /// Left the bailout radius. `iterations` counts the steps that stayed inside
    /// before the escaping one, so it is always below the budget.
    Escaped { iterations: u32 },
    /// Still inside after the whole budget.
    Bounded,
}

impl EscapeResult {
    /// Classifies an escape counter against the budget it was run with.
    #[inline]
    pub fn from_counter(counter: u32, iteration_budget: u32) -> Self {
        if counter < iteration_budget {
            EscapeResult::Escaped {
                iterations: counter,
            }
        } else {
            EscapeResult::Bounded
        }
    }
}

/// A strategy for rendering one frame.
pub trait Kernel {
    fn name(&self) -> &'static str;

    /// Computes and writes every visible cell of `raster`.
    ///
    /// `raster` is only borrowed for the duration of the call. There are no
    /// error paths; the preconditions are enforced by [`RasterView::new`] and
    /// [`IterationParameters::new`].
    fn render_frame(&self, raster: &mut RasterView, params: IterationParameters, view: ViewState);
}

/// Kernel selection, made once at startup.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KernelKind {
    Scalar,
    #[default]
    Vector,
}

impl KernelKind {
    pub fn build(self) -> Box<dyn Kernel> {
        match self {
            KernelKind::Scalar => Box::new(ScalarKernel),
            KernelKind::Vector => Box::new(VectorKernel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colour, point::Offset, raster::Raster, screen};

    fn render(
        kind: KernelKind,
        size: screen::Size,
        params: IterationParameters,
        view: ViewState,
    ) -> Raster {
        let mut raster = Raster::new(size);
        kind.build().render_frame(&mut raster.lock(), params, view);
        raster
    }

    #[test]
    fn counter_classification() {
        assert_eq!(
            EscapeResult::from_counter(3, 4),
            EscapeResult::Escaped { iterations: 3 }
        );
        assert_eq!(EscapeResult::from_counter(4, 4), EscapeResult::Bounded);
    }

    #[test]
    fn kinds_build_their_kernels() {
        assert_eq!(KernelKind::Scalar.build().name(), "scalar");
        assert_eq!(KernelKind::Vector.build().name(), "vector");
        assert_eq!(KernelKind::default(), KernelKind::Vector);
    }

    #[test_log::test]
    fn scalar_and_vector_frames_agree() {
        let size = screen::Size::new(203, 151);
        let params = IterationParameters::new(4.0, 64);
        let views = [
            ViewState::default(),
            ViewState {
                scale: 1.5,
                origin: Offset::new(120.0, -35.0),
            },
            ViewState {
                scale: 0.02,
                origin: Offset::new(150.0, 40.0),
            },
        ];

        for view in views {
            let scalar = render(KernelKind::Scalar, size, params, view);
            let vector = render(KernelKind::Vector, size, params, view);

            let mut mismatches = 0;
            for h in 0..size.height {
                mismatches += scalar
                    .row(h)
                    .iter()
                    .zip(vector.row(h))
                    .filter(|(a, b)| a != b)
                    .count();
            }
            // Lanes derive `re` as `re0 + i * dx`, which can round differently from
            // the per-pixel mapping right on the set's boundary.
            assert!(
                mismatches <= size.width as usize,
                "{mismatches} of {} pixels differ for {view:?}",
                size.pixel_count()
            );
        }
    }

    #[test]
    fn pan_round_trip_restores_output() {
        let size = screen::Size::new(97, 64);
        let params = IterationParameters::new(4.0, 50);
        for kind in [KernelKind::Scalar, KernelKind::Vector] {
            let mut view = ViewState {
                scale: 1.0,
                origin: Offset::new(-40.0, 12.0),
            };
            let before = render(kind, size, params, view);

            view.origin.x -= 10.0;
            let moved = render(kind, size, params, view);
            view.origin.x += 10.0;
            let after = render(kind, size, params, view);

            assert_ne!(before.cells(), moved.cells());
            assert_eq!(before.cells(), after.cells());
        }
    }

    #[test]
    fn every_cell_is_one_of_two_colours() {
        let size = screen::Size::new(64, 48);
        for kind in [KernelKind::Scalar, KernelKind::Vector] {
            let raster = render(kind, size, IterationParameters::default(), ViewState::default());
            for h in 0..size.height {
                assert!(raster
                    .row(h)
                    .iter()
                    .all(|&cell| cell == colour::BOUNDED_CELL || cell == colour::ESCAPED_CELL));
            }
        }
    }
}
