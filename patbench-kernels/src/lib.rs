#![warn(missing_docs)]
//! Patbench Kernels
//!
//! Five benchmark kernels written against the `patbench-core` patterns:
//! - `blur`: stencil map over the colour planes of a bitmap
//! - `dgemv`: matrix-vector product built from reductions
//! - `mandelbrot`: per-pixel indexed map
//! - `mergesort`: divide-and-conquer sort
//! - `sensor`: sliding-window moving average
//!
//! Plus their collaborators: kernel-file loading, a 24-bit BMP codec and
//! seeded random data generation.

pub mod blur;
pub mod datagen;
pub mod dgemv;
mod error;
pub mod io;
pub mod mandelbrot;
pub mod mergesort;
pub mod sensor;

pub use datagen::DataGen;
pub use dgemv::Matrix;
pub use error::FormatError;
pub use io::{BmpImage, Rgb};
pub use mandelbrot::MandelbrotParams;
pub use sensor::Sensor;
