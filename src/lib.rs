//! Escape-time Mandelbrot rendering on the CPU.
//!
//! [`kernel`] holds the two interchangeable renderers, [`mapper`] the shared
//! pixel-to-plane mapping, and [`raster`] the pixel memory they write into.
//! The remaining modules are the interactive viewer built around them.

pub mod colour;
pub mod command_encoder;
pub mod config;
pub mod frame;
pub mod input;
pub mod kernel;
pub mod mapper;
pub mod point;
pub mod present;
pub mod raster;
pub mod screen;
pub mod view;
