//! Keyboard controls for panning and zooming.
//!
//! Two variants: [`ControlMode::Discrete`] applies one step per key press (key
//! repeat included), [`ControlMode::Continuous`] moves while a key is held,
//! scaled by the elapsed frame time.

use fnv::FnvHashSet;
use log::debug;
use winit::event::{ElementState, ModifiersState, VirtualKeyCode};

use crate::view::{Pan, ViewState, Zoom, ZOOM_STEP};

/// Pixels panned per key press.
pub const STEP: f32 = 10.0;

/// Multiplier applied to the step while Shift is held.
pub const FAST_MULTIPLIER: f32 = 10.0;

/// Pixels panned per second while an arrow key is held.
pub const PAN_RATE: f32 = 200.0;

/// Fraction of `scale` gained or lost per second while a zoom key is held.
pub const ZOOM_RATE: f32 = 1.0;

/// `f32` runs out of precision below this.
pub const MIN_SCALE: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Pan(Pan),
    Zoom(Zoom),
}

impl Action {
    pub fn for_key(key: VirtualKeyCode) -> Option<Self> {
        let action = match key {
            VirtualKeyCode::Up => Action::Pan(Pan::Up),
            VirtualKeyCode::Down => Action::Pan(Pan::Down),
            VirtualKeyCode::Left => Action::Pan(Pan::Left),
            VirtualKeyCode::Right => Action::Pan(Pan::Right),
            VirtualKeyCode::NumpadAdd | VirtualKeyCode::Plus | VirtualKeyCode::Equals => {
                Action::Zoom(Zoom::Grow)
            }
            VirtualKeyCode::NumpadSubtract | VirtualKeyCode::Minus => Action::Zoom(Zoom::Shrink),
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Discrete,
    Continuous,
}

pub struct Controller {
    mode: ControlMode,
    fast: bool,
    held: FnvHashSet<Action>,
}

impl Controller {
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            fast: false,
            held: FnvHashSet::default(),
        }
    }

    pub fn modifiers_changed(&mut self, modifiers: ModifiersState) {
        self.fast = modifiers.shift();
    }

    /// Handles a key event; returns whether `view` changed.
    pub fn key(&mut self, key: VirtualKeyCode, state: ElementState, view: &mut ViewState) -> bool {
        let Some(action) = Action::for_key(key) else {
            return false;
        };

        match (self.mode, state) {
            (ControlMode::Discrete, ElementState::Pressed) => {
                self.apply(action, 1.0, view);
                true
            }
            (ControlMode::Discrete, ElementState::Released) => false,
            (ControlMode::Continuous, ElementState::Pressed) => {
                self.held.insert(action);
                false
            }
            (ControlMode::Continuous, ElementState::Released) => {
                self.held.remove(&action);
                false
            }
        }
    }

    /// Applies held keys for `elapsed` seconds; returns whether `view` changed.
    ///
    /// Does nothing in discrete mode.
    pub fn advance(&mut self, elapsed: f32, view: &mut ViewState) -> bool {
        if self.mode == ControlMode::Discrete || self.held.is_empty() {
            return false;
        }
        for &action in &self.held {
            self.apply(action, elapsed, view);
        }
        true
    }

    fn apply(&self, action: Action, amount: f32, view: &mut ViewState) {
        let multiplier = if self.fast { FAST_MULTIPLIER } else { 1.0 };
        match (self.mode, action) {
            (ControlMode::Discrete, Action::Pan(direction)) => {
                view.pan(direction, STEP * multiplier * amount)
            }
            (ControlMode::Continuous, Action::Pan(direction)) => {
                view.pan(direction, PAN_RATE * multiplier * amount)
            }
            (ControlMode::Discrete, Action::Zoom(direction)) => view.zoom(direction, ZOOM_STEP),
            // Capped so a long frame can't flip the sign of `scale`.
            (ControlMode::Continuous, Action::Zoom(direction)) => {
                view.zoom(direction, (ZOOM_RATE * amount).min(0.5))
            }
        }
        view.scale = view.scale.max(MIN_SCALE);
        debug!("{:?} -> {:?}", action, view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Offset;

    fn press(controller: &mut Controller, key: VirtualKeyCode, view: &mut ViewState) -> bool {
        controller.key(key, ElementState::Pressed, view)
    }

    #[test]
    fn arrows_pan_by_step() {
        let mut controller = Controller::new(ControlMode::Discrete);
        let mut view = ViewState::default();

        assert!(press(&mut controller, VirtualKeyCode::Up, &mut view));
        assert_eq!(view.origin, Offset::new(0.0, -10.0));
        press(&mut controller, VirtualKeyCode::Left, &mut view);
        assert_eq!(view.origin, Offset::new(10.0, -10.0));
    }

    #[test]
    fn shift_multiplies_step() {
        let mut controller = Controller::new(ControlMode::Discrete);
        let mut view = ViewState::default();

        controller.modifiers_changed(ModifiersState::SHIFT);
        press(&mut controller, VirtualKeyCode::Down, &mut view);
        assert_eq!(view.origin, Offset::new(0.0, 100.0));

        controller.modifiers_changed(ModifiersState::empty());
        press(&mut controller, VirtualKeyCode::Down, &mut view);
        assert_eq!(view.origin, Offset::new(0.0, 110.0));
    }

    #[test]
    fn plus_and_minus_zoom_by_ten_percent() {
        let mut controller = Controller::new(ControlMode::Discrete);
        let mut view = ViewState::default();

        press(&mut controller, VirtualKeyCode::NumpadAdd, &mut view);
        assert!((view.scale - 1.1).abs() < 1e-6);
        press(&mut controller, VirtualKeyCode::Minus, &mut view);
        assert!((view.scale - 0.99).abs() < 1e-6);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut controller = Controller::new(ControlMode::Discrete);
        let mut view = ViewState::default();
        assert!(!press(&mut controller, VirtualKeyCode::A, &mut view));
        assert!(!controller.key(VirtualKeyCode::Up, ElementState::Released, &mut view));
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn continuous_pan_scales_with_elapsed_time() {
        let mut controller = Controller::new(ControlMode::Continuous);
        let mut view = ViewState {
            scale: 0.5,
            origin: Offset::ZERO,
        };

        assert!(!press(&mut controller, VirtualKeyCode::Up, &mut view));
        assert_eq!(view, ViewState { scale: 0.5, origin: Offset::ZERO });

        assert!(controller.advance(0.25, &mut view));
        assert_eq!(view.origin, Offset::new(0.0, -PAN_RATE * 0.5 * 0.25));

        controller.key(VirtualKeyCode::Up, ElementState::Released, &mut view);
        let stopped = view;
        assert!(!controller.advance(1.0, &mut view));
        assert_eq!(view, stopped);
    }

    #[test]
    fn continuous_zoom_keeps_scale_positive() {
        let mut controller = Controller::new(ControlMode::Continuous);
        let mut view = ViewState::default();

        press(&mut controller, VirtualKeyCode::NumpadSubtract, &mut view);
        for _ in 0..100 {
            controller.advance(10.0, &mut view);
        }
        assert!(view.scale >= MIN_SCALE);
    }

    #[test]
    fn discrete_mode_ignores_advance() {
        let mut controller = Controller::new(ControlMode::Discrete);
        let mut view = ViewState::default();
        press(&mut controller, VirtualKeyCode::Right, &mut view);
        let after_press = view;
        assert!(!controller.advance(1.0, &mut view));
        assert_eq!(view, after_press);
    }
}
