//! Blur: 2-D stencil convolution over each colour plane of a bitmap.

use crate::error::FormatError;
use crate::io::BmpImage;
use patbench_core::{ExecutionPolicy, KernelTable, map_stencil};

/// Convolve one plane `width` pixels wide
pub fn blur_plane(
    plane: &[u8],
    width: usize,
    kernel: &KernelTable,
    policy: &ExecutionPolicy,
) -> Result<Vec<u8>, FormatError> {
    Ok(map_stencil(plane, width, kernel, policy)?)
}

/// Blur the red, green and blue planes independently.
///
/// The returned image keeps the input's header bytes.
pub fn blur(
    image: &BmpImage,
    kernel: &KernelTable,
    policy: &ExecutionPolicy,
) -> Result<BmpImage, FormatError> {
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        kernel_side = kernel.side(),
        policy = %policy,
        "blurring image"
    );
    let [red, green, blue] = image.planes();
    let planes = [
        blur_plane(red, image.width(), kernel, policy)?,
        blur_plane(green, image.width(), kernel, policy)?,
        blur_plane(blue, image.width(), kernel, policy)?,
    ];
    image.with_planes(planes)
}
