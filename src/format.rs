//! Pixel format tags and their size formulas.
//!
//! # Buffer layouts
//!
//! ```text
//! TrueColor*      data[y * w * px_bytes + x * px_bytes ..]
//! Alpha{1,2,4,8}  bit-packed rows, MSB first, each row starts on a byte boundary
//! Indexed{N}      [palette: 2^N entries x (b, g, r, opa)] followed by Alpha{N}-style rows
//! ```
//!
//! The sizes returned by [`PixelFormat::buffer_size`] intentionally over-allocate one byte per
//! row for the 1, 2 and 4 bit formats, so that integer division can never truncate a row.

use crate::color::ColorDepth;
use crate::error::ImageError;

/// Bytes per palette entry: three color channels and an opacity byte.
pub const PALETTE_ENTRY_BYTES: usize = 4;

/// How the pixels of an image are encoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    TrueColor,
    TrueColorAlpha,
    TrueColorChromaKeyed,
    Alpha1,
    Alpha2,
    Alpha4,
    Alpha8,
    Indexed1,
    Indexed2,
    Indexed4,
    Indexed8,
}

impl PixelFormat {
    /// Every supported format, in code order.
    pub const ALL: [PixelFormat; 11] = [
        PixelFormat::TrueColor,
        PixelFormat::TrueColorAlpha,
        PixelFormat::TrueColorChromaKeyed,
        PixelFormat::Indexed1,
        PixelFormat::Indexed2,
        PixelFormat::Indexed4,
        PixelFormat::Indexed8,
        PixelFormat::Alpha1,
        PixelFormat::Alpha2,
        PixelFormat::Alpha4,
        PixelFormat::Alpha8,
    ];

    /// Parses the numeric format code stored in image headers.
    pub fn from_code(code: u8) -> Result<Self, ImageError> {
        let format = match code {
            4 => PixelFormat::TrueColor,
            5 => PixelFormat::TrueColorAlpha,
            6 => PixelFormat::TrueColorChromaKeyed,
            7 => PixelFormat::Indexed1,
            8 => PixelFormat::Indexed2,
            9 => PixelFormat::Indexed4,
            10 => PixelFormat::Indexed8,
            11 => PixelFormat::Alpha1,
            12 => PixelFormat::Alpha2,
            13 => PixelFormat::Alpha4,
            14 => PixelFormat::Alpha8,
            _ => return Err(ImageError::InvalidFormat(code)),
        };
        Ok(format)
    }

    /// Numeric code of this format, the inverse of [`from_code`](Self::from_code).
    pub fn code(self) -> u8 {
        match self {
            PixelFormat::TrueColor => 4,
            PixelFormat::TrueColorAlpha => 5,
            PixelFormat::TrueColorChromaKeyed => 6,
            PixelFormat::Indexed1 => 7,
            PixelFormat::Indexed2 => 8,
            PixelFormat::Indexed4 => 9,
            PixelFormat::Indexed8 => 10,
            PixelFormat::Alpha1 => 11,
            PixelFormat::Alpha2 => 12,
            PixelFormat::Alpha4 => 13,
            PixelFormat::Alpha8 => 14,
        }
    }

    /// Size of one pixel in bits at the given true-color depth.
    pub fn pixel_bits(self, depth: ColorDepth) -> u8 {
        match self {
            PixelFormat::TrueColor | PixelFormat::TrueColorChromaKeyed => depth.bits(),
            PixelFormat::TrueColorAlpha => (depth.alpha_pixel_bytes() * 8) as u8,
            PixelFormat::Alpha1 | PixelFormat::Indexed1 => 1,
            PixelFormat::Alpha2 | PixelFormat::Indexed2 => 2,
            PixelFormat::Alpha4 | PixelFormat::Indexed4 => 4,
            PixelFormat::Alpha8 | PixelFormat::Indexed8 => 8,
        }
    }

    /// Total buffer size in bytes, palette included.
    ///
    /// Negative dimensions count as zero.
    pub fn buffer_size(self, width: i16, height: i16, depth: ColorDepth) -> usize {
        let w = width.max(0) as usize;
        let h = height.max(0) as usize;
        match self {
            PixelFormat::TrueColor | PixelFormat::TrueColorChromaKeyed => depth.bytes() * w * h,
            PixelFormat::TrueColorAlpha => depth.alpha_pixel_bytes() * w * h,
            PixelFormat::Alpha1 => (w / 8 + 1) * h,
            PixelFormat::Alpha2 => (w / 4 + 1) * h,
            PixelFormat::Alpha4 => (w / 2 + 1) * h,
            PixelFormat::Alpha8 => w * h,
            PixelFormat::Indexed1 => (w / 8 + 1) * h + self.palette_bytes(),
            PixelFormat::Indexed2 => (w / 4 + 1) * h + self.palette_bytes(),
            PixelFormat::Indexed4 => (w / 2 + 1) * h + self.palette_bytes(),
            PixelFormat::Indexed8 => w * h + self.palette_bytes(),
        }
    }

    /// True only for formats with a per-pixel alpha byte.
    ///
    /// Alpha-only and indexed formats report `false` even though they carry transparency;
    /// callers use this to pick the compositing path, not to ask whether a pixel can be
    /// transparent.
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::TrueColorAlpha)
    }

    pub fn is_chroma_keyed(self) -> bool {
        matches!(self, PixelFormat::TrueColorChromaKeyed)
    }

    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelFormat::Indexed1
                | PixelFormat::Indexed2
                | PixelFormat::Indexed4
                | PixelFormat::Indexed8
        )
    }

    pub fn is_alpha_only(self) -> bool {
        matches!(
            self,
            PixelFormat::Alpha1 | PixelFormat::Alpha2 | PixelFormat::Alpha4 | PixelFormat::Alpha8
        )
    }

    /// True for the formats storing native colors directly.
    pub fn is_native_color(self) -> bool {
        matches!(
            self,
            PixelFormat::TrueColor | PixelFormat::TrueColorAlpha | PixelFormat::TrueColorChromaKeyed
        )
    }

    /// Number of palette entries, 0 for non-indexed formats.
    pub fn palette_len(self) -> usize {
        match self {
            PixelFormat::Indexed1 => 2,
            PixelFormat::Indexed2 => 4,
            PixelFormat::Indexed4 => 16,
            PixelFormat::Indexed8 => 256,
            _ => 0,
        }
    }

    /// Bytes reserved in front of the pixel data for the palette.
    pub fn palette_bytes(self) -> usize {
        self.palette_len() * PALETTE_ENTRY_BYTES
    }
}
