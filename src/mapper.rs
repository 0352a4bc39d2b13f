//! Pixel to complex-plane mapping shared by every kernel.
//!
//! The raster's centre pixel sits on the plane's origin, `im` grows upwards
//! (row 0 is the most positive), and `scale` is the half-extent of the visible
//! window along each axis. `ViewState::origin` is divided by the raster
//! dimension, so one unit of origin is one pixel's worth of "fraction of the
//! window" rather than a plane unit.

use crate::{point::Complex, screen, view::ViewState};

/// Imaginary coordinate shared by every pixel in row `h`.
#[inline]
pub fn row_im(h: u32, size: screen::Size, view: &ViewState) -> f32 {
    let height = size.height as f32;
    (height - 2.0 * h as f32) / height * view.scale - view.origin.y / height
}

/// Real coordinate shared by every pixel in column `w`.
#[inline]
pub fn column_re(w: u32, size: screen::Size, view: &ViewState) -> f32 {
    let width = size.width as f32;
    (2.0 * w as f32 - width) / width * view.scale - view.origin.x / width
}

/// Plane-space distance between horizontally adjacent pixels.
#[inline]
pub fn pixel_delta(size: screen::Size, view: &ViewState) -> f32 {
    2.0 * view.scale / size.width as f32
}

/// Maps pixel `(w, h)` of a raster of `size` to the complex plane.
#[inline]
pub fn map(w: u32, h: u32, size: screen::Size, view: &ViewState) -> Complex {
    Complex {
        re: column_re(w, size, view),
        im: row_im(h, size, view),
    }
}
