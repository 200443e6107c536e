//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::format::PixelFormat;

/// Failures reported by format lookups, allocation and palette writes.
///
/// Coordinate preconditions of the pixel accessors are not represented here: those paths sit in
/// the compositor's inner loop and document their bounds instead of checking them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// A raw format code did not name any supported pixel format.
    #[error("invalid pixel format code {0}")]
    InvalidFormat(u8),
    /// The system could not provide a buffer of the required size.
    #[error("failed to allocate {bytes} bytes for a {width}x{height} image")]
    AllocationFailure {
        width: i16,
        height: i16,
        bytes: usize,
    },
    /// Width or height was negative.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i16, height: i16 },
    /// A raw buffer does not match the size computed for its format and dimensions.
    #[error("buffer holds {actual} bytes but {format:?} needs {expected}")]
    BufferSizeMismatch {
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
    /// A palette operation was requested on a format without a palette.
    #[error("{0:?} images have no palette")]
    NotIndexed(PixelFormat),
    /// A palette index beyond the format's palette length.
    #[error("palette index {index} out of range for {len} entries")]
    PaletteIndexOutOfRange { index: usize, len: usize },
}
