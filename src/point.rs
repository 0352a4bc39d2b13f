//! Points in the two coordinate spaces the viewer works with.
//!
//! [`Offset`] lives in pixel space (the pan position), [`Complex`] lives on the
//! complex plane (mapper output and the iterate). They share a layout but are
//! kept apart so one can't be passed where the other is expected.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Self = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

/// Pixel-space offset of the visible window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Self = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
