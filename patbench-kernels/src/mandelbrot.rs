//! Mandelbrot: escape-time fractal, one independent map per pixel.

use crate::error::FormatError;
use crate::io::{BmpImage, Rgb};
use patbench_core::{ExecutionPolicy, map_indexed};

/// Iteration cap of the escape-time loop
pub const MAX_ITERATION: u32 = 1000;

/// Viewport and iteration limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotParams {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Real part of the image centre
    pub center_re: f64,
    /// Imaginary part of the image centre
    pub center_im: f64,
    /// Complex-plane units per pixel
    pub zoom: f64,
    /// Escape-time iteration cap
    pub max_iteration: u32,
}

impl MandelbrotParams {
    /// Default viewport for a `width × height` image
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            center_re: -0.7,
            center_im: 0.0,
            zoom: 0.003,
            max_iteration: MAX_ITERATION,
        }
    }

    /// Complex coordinate of pixel (`col`, `row`)
    pub fn point(&self, col: usize, row: usize) -> (f64, f64) {
        let re = col as f64 * self.zoom + (self.center_re - (self.width as f64 / 2.0) * self.zoom);
        let im = row as f64 * self.zoom + (self.center_im - (self.height as f64 / 2.0) * self.zoom);
        (re, im)
    }
}

/// Escape-time iteration count of `c`, in `1..=max_iteration`
pub fn pixel_iterations(c_re: f64, c_im: f64, max_iteration: u32) -> u32 {
    let (mut z_re, mut z_im) = (0.0f64, 0.0f64);
    let mut iterations = 0;
    loop {
        if z_re * z_re + z_im * z_im >= 4.0 {
            break;
        }
        iterations += 1;
        if iterations >= max_iteration {
            break;
        }
        let re = z_re * z_re - z_im * z_im + c_re;
        z_im = 2.0 * z_re * z_im + c_im;
        z_re = re;
    }
    iterations
}

/// Map an iteration count onto the six-band colour ramp
pub fn color(iterations: u32, max_iteration: u32) -> Rgb {
    let it = (iterations.min(max_iteration) * 127 / max_iteration.max(1)) as i32;
    let (r, g, b) = match it {
        0 => (255, 0, 0),
        1..=15 => (16 * (16 - it), 0, 16 * it - 1),
        16..=31 => (0, 16 * (it - 16), 16 * (32 - it) - 1),
        32..=63 => (8 * (it - 32), 8 * (64 - it) - 1, 0),
        _ => (255 - (it - 64) * 4, 0, 0),
    };
    Rgb {
        r: r as u8,
        g: g as u8,
        b: b as u8,
    }
}

/// Render the image row-major, top row first
pub fn render(params: &MandelbrotParams, policy: &ExecutionPolicy) -> Vec<Rgb> {
    let width = params.width.max(1);
    tracing::debug!(
        width = params.width,
        height = params.height,
        policy = %policy,
        "rendering mandelbrot"
    );
    map_indexed(
        params.width * params.height,
        |i| {
            let (re, im) = params.point(i % width, i / width);
            color(
                pixel_iterations(re, im, params.max_iteration),
                params.max_iteration,
            )
        },
        policy,
    )
}

/// Wrap rendered pixels in a fresh 24-bit bitmap
pub fn to_bitmap(params: &MandelbrotParams, pixels: &[Rgb]) -> Result<BmpImage, FormatError> {
    BmpImage::from_rgb(params.width, params.height, pixels)
}
