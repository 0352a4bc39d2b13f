//! Per-frame inputs to a kernel: where the camera is and how hard to iterate.

use crate::point::Offset;

/// Fraction by which a single zoom step grows or shrinks [`ViewState::scale`].
pub const ZOOM_STEP: f32 = 0.1;

/// The squared bailout radius used unless configured otherwise.
pub const DEFAULT_BAILOUT_SQ: f32 = 4.0;

pub const DEFAULT_ITERATION_BUDGET: u32 = 100;

/// Camera state, updated by input handling between frames and read-only during one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Half-extent of the visible plane along each axis. Must stay positive.
    pub scale: f32,
    /// Pan position in pixel space, divided by the raster dimension when mapped.
    pub origin: Offset,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin: Offset::ZERO,
        }
    }
}

/// A screen-space direction the view can be panned in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pan {
    Up,
    Down,
    Left,
    Right,
}

/// Multiplicative change to [`ViewState::scale`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zoom {
    /// `+`: widens the visible window.
    Grow,
    /// `-`: narrows the visible window.
    Shrink,
}

impl ViewState {
    /// Moves the origin by `step` pixels, scaled by the current `scale`.
    ///
    /// Up/down move `origin.y`, left/right move `origin.x`; the signs make the
    /// picture follow the arrow that was pressed.
    pub fn pan(&mut self, direction: Pan, step: f32) {
        let delta = step * self.scale;
        match direction {
            Pan::Up => self.origin.y -= delta,
            Pan::Down => self.origin.y += delta,
            Pan::Left => self.origin.x += delta,
            Pan::Right => self.origin.x -= delta,
        }
    }

    /// Changes `scale` by `amount` of itself: `amount = ZOOM_STEP` is one key press.
    pub fn zoom(&mut self, direction: Zoom, amount: f32) {
        let delta = amount * self.scale;
        match direction {
            Zoom::Grow => self.scale += delta,
            Zoom::Shrink => self.scale -= delta,
        }
    }
}

/// How long to iterate and when to give up on a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationParameters {
    /// Squared magnitude a point must exceed to count as escaped.
    ///
    /// This is already squared. Use [`IterationParameters::from_radius`] for a
    /// linear radius.
    pub bailout_sq: f32,
    pub iteration_budget: u32,
}

impl IterationParameters {
    /// # Panics
    ///
    /// If `bailout_sq` is not positive or `iteration_budget` is zero.
    pub fn new(bailout_sq: f32, iteration_budget: u32) -> Self {
        assert!(bailout_sq > 0.0, "bailout_sq must be positive, got {bailout_sq}");
        assert!(iteration_budget > 0, "iteration_budget must be at least 1");
        Self {
            bailout_sq,
            iteration_budget,
        }
    }

    /// Builds parameters from a linear bailout radius, squaring it.
    pub fn from_radius(radius: f32, iteration_budget: u32) -> Self {
        Self::new(radius * radius, iteration_budget)
    }
}

impl Default for IterationParameters {
    fn default() -> Self {
        Self::new(DEFAULT_BAILOUT_SQ, DEFAULT_ITERATION_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_is_scaled_by_current_scale() {
        let mut view = ViewState {
            scale: 0.5,
            origin: Offset::ZERO,
        };
        view.pan(Pan::Up, 10.0);
        view.pan(Pan::Right, 100.0);
        assert_eq!(view.origin, Offset::new(-50.0, -5.0));
    }

    #[test]
    fn opposite_pans_cancel() {
        let mut view = ViewState::default();
        view.pan(Pan::Left, 10.0);
        view.pan(Pan::Right, 10.0);
        view.pan(Pan::Down, 100.0);
        view.pan(Pan::Up, 100.0);
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn zoom_changes_scale_by_ten_percent() {
        let mut view = ViewState::default();
        view.zoom(Zoom::Grow, ZOOM_STEP);
        assert!((view.scale - 1.1).abs() < 1e-6);

        let mut view = ViewState::default();
        view.zoom(Zoom::Shrink, ZOOM_STEP);
        assert!((view.scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn radius_is_squared() {
        let params = IterationParameters::from_radius(3.0, 10);
        assert_eq!(params.bailout_sq, 9.0);
        assert_eq!(params.iteration_budget, 10);
    }

    #[test]
    #[should_panic(expected = "iteration_budget")]
    fn zero_budget_is_rejected() {
        IterationParameters::new(4.0, 0);
    }
}
