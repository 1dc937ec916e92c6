//! Kernel and file format errors

use patbench_core::PatternError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading inputs or running a kernel
#[derive(Debug, Error)]
pub enum FormatError {
    /// File could not be read or written
    #[error("Can't access {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Kernel file held an even (or zero) number of weights
    #[error("Kernel should have odd size, got {0} weights")]
    KernelParity(usize),

    /// Kernel file held something other than an integer
    #[error("Kernel weight #{position} is not an integer: {token:?}")]
    KernelToken {
        /// Raw token
        token: String,
        /// Zero-based position of the token
        position: usize,
    },

    /// Bitmap is not an uncompressed, single-plane, 24-bit bottom-up BMP
    #[error("BMP incorrect format: {0}")]
    UnsupportedBitmap(String),

    /// Input ended before the declared data
    #[error("Truncated input: needed {needed} bytes, found {actual}")]
    Truncated {
        /// Bytes required by the header
        needed: usize,
        /// Bytes actually present
        actual: usize,
    },

    /// Pattern rejected its arguments
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.into(),
            source,
        }
    }
}
