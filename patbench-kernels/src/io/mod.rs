//! Input and output collaborators of the kernels.

mod bmp;
mod kernel_file;

pub use bmp::{BmpImage, Rgb};
pub use kernel_file::{load_kernel, parse_kernel};
