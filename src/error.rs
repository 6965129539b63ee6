//! Error types for pixel_delta.

use thiserror::Error;

/// Errors surfaced by the difference engine.
///
/// Every variant is deterministic for a given input: nothing here is
/// transient, so callers should never retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiffError {
    /// A pixel's alpha channel is above the 8-bit range.
    #[error("invalid alpha {alpha}: expected a value in 0..=255")]
    InvalidAlpha { alpha: f64 },

    /// The two images being compared have different pixel counts.
    #[error("length mismatch: left image has {left} pixels, right image has {right}")]
    LengthMismatch { left: usize, right: usize },

    /// An RGBA byte buffer whose length is not a whole number of pixels.
    #[error("misaligned RGBA buffer: {len} bytes is not a multiple of 4")]
    MisalignedBuffer { len: usize },

    /// A parallel worker panicked or was cancelled before finishing its range.
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;

/// Fails with `LengthMismatch` unless both images hold the same number of pixels.
pub(crate) fn ensure_same_length(left: usize, right: usize) -> Result<()> {
    if left != right {
        log::warn!("rejecting comparison: {left} vs {right} pixels");
        return Err(DiffError::LengthMismatch { left, right });
    }
    Ok(())
}
