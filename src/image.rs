//! Image descriptors and the per-pixel read/write paths.
//!
//! # Memory Layout
//!
//! True-color pixels are stored row-major at
//!
//! ```text
//! data[(y * width + x) * pixel_bytes ..]
//! ```
//!
//! Alpha-only and indexed pixels are bit-packed, most significant bits first, with every row
//! starting on a byte boundary:
//!
//! ```text
//! data[palette_bytes + y * stride + (x * bpp) / 8]   stride = ceil(width * bpp / 8)
//! ```
//!
//! All bit offsets and masks are computed in [`ImageDesc::packed_position`]; nothing else in
//! the crate touches packed bytes.

use crate::color::{Color, ColorDepth, OPA_COVER, OPA_TRANSP, Opa};
use crate::error::ImageError;
use crate::format::{PALETTE_ENTRY_BYTES, PixelFormat};

/// Pixel coordinate type. Image dimensions are bounded by its maximum.
pub type Coord = i16;

/// Largest representable coordinate.
pub const COORD_MAX: Coord = Coord::MAX;

/// One palette slot of an indexed image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub opa: Opa,
}

impl PaletteEntry {
    pub const fn new(color: Color, opa: Opa) -> Self {
        Self { color, opa }
    }

    /// An opaque entry.
    pub const fn opaque(color: Color) -> Self {
        Self::new(color, OPA_COVER)
    }
}

/// Location of a bit-packed pixel: byte index, right shift and value mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PackedPosition {
    byte: usize,
    shift: u32,
    mask: u8,
}

/// An image buffer together with the format and dimensions needed to interpret it.
///
/// The descriptor owns its bytes exclusively. The buffer length always equals
/// [`PixelFormat::buffer_size`] for the descriptor's format, dimensions and depth.
///
/// # Preconditions
///
/// The pixel accessors expect `0 <= x < width` and `0 <= y < height`. They sit in the
/// compositor's inner loop and do not check this; an out-of-range coordinate panics on slice
/// indexing (or reads a neighbouring pixel of the same image) but never reads foreign memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    width: Coord,
    height: Coord,
    format: PixelFormat,
    depth: ColorDepth,
    chroma_key: Color,
    data: Vec<u8>,
}

impl ImageDesc {
    /// Allocates a zero-initialized image.
    ///
    /// Returns [`ImageError::AllocationFailure`] instead of aborting when the memory cannot be
    /// reserved.
    pub fn allocate(
        width: Coord,
        height: Coord,
        format: PixelFormat,
        depth: ColorDepth,
    ) -> Result<Self, ImageError> {
        if width < 0 || height < 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        let bytes = format.buffer_size(width, height, depth);
        let mut data = Vec::new();
        if data.try_reserve_exact(bytes).is_err() {
            log::warn!("cannot reserve {bytes} bytes for a {width}x{height} {format:?} image");
            return Err(ImageError::AllocationFailure {
                width,
                height,
                bytes,
            });
        }
        data.resize(bytes, 0);
        log::debug!("allocated {width}x{height} {format:?} image at {depth:?} ({bytes} bytes)");
        Ok(Self {
            width,
            height,
            format,
            depth,
            chroma_key: Color::CHROMA_KEY,
            data,
        })
    }

    /// Adopts raw bytes supplied by resource loading.
    ///
    /// The length must match the size formula exactly; the contents are trusted as-is.
    pub fn from_bytes(
        width: Coord,
        height: Coord,
        format: PixelFormat,
        depth: ColorDepth,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width < 0 || height < 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        let expected = format.buffer_size(width, height, depth);
        if data.len() != expected {
            return Err(ImageError::BufferSizeMismatch {
                format,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            depth,
            chroma_key: Color::CHROMA_KEY,
            data,
        })
    }

    /// Releases the buffer. The descriptor is consumed, so it cannot be used afterwards.
    pub fn free(self) {
        log::debug!(
            "freeing {}x{} {:?} image ({} bytes)",
            self.width,
            self.height,
            self.format,
            self.data.len()
        );
        drop(self);
    }

    /// Replaces the color treated as transparent by `TrueColorChromaKeyed` images.
    pub fn with_chroma_key(mut self, key: Color) -> Self {
        self.chroma_key = key;
        self
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn chroma_key(&self) -> Color {
        self.chroma_key
    }

    /// The raw buffer, palette first for indexed formats.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns true if (x, y) lies inside the image.
    #[inline]
    pub fn contains(&self, x: Coord, y: Coord) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Returns the color of a pixel.
    ///
    /// Alpha-only formats store no hue and always return `fallback`.
    #[inline]
    pub fn get_pixel_color(&self, x: Coord, y: Coord, fallback: Color) -> Color {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        match self.format {
            PixelFormat::TrueColor
            | PixelFormat::TrueColorAlpha
            | PixelFormat::TrueColorChromaKeyed => {
                Color::decode(self.read_native_raw(x, y), self.depth)
            }
            PixelFormat::Alpha1
            | PixelFormat::Alpha2
            | PixelFormat::Alpha4
            | PixelFormat::Alpha8 => {
                fallback
            }
            PixelFormat::Indexed1
            | PixelFormat::Indexed2
            | PixelFormat::Indexed4
            | PixelFormat::Indexed8 => {
                let index = self.read_packed(x, y) as usize;
                self.read_palette(index).color
            }
        }
    }

    /// Returns the opacity of a pixel.
    #[inline]
    pub fn get_pixel_alpha(&self, x: Coord, y: Coord) -> Opa {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        match self.format {
            PixelFormat::TrueColor => OPA_COVER,
            PixelFormat::TrueColorAlpha => {
                let px_bytes = self.depth.alpha_pixel_bytes();
                self.data[self.native_offset(x, y) + px_bytes - 1]
            }
            PixelFormat::TrueColorChromaKeyed => {
                if self.read_native_raw(x, y) == self.chroma_key.encode(self.depth) {
                    OPA_TRANSP
                } else {
                    OPA_COVER
                }
            }
            PixelFormat::Alpha1
            | PixelFormat::Alpha2
            | PixelFormat::Alpha4
            | PixelFormat::Alpha8 => {
                let max = (1u16 << self.bpp()) - 1;
                (self.read_packed(x, y) as u16 * 255 / max) as Opa
            }
            PixelFormat::Indexed1
            | PixelFormat::Indexed2
            | PixelFormat::Indexed4
            | PixelFormat::Indexed8 => {
                let index = self.read_packed(x, y) as usize;
                self.read_palette(index).opa
            }
        }
    }

    /// Writes the color of a pixel without touching its alpha.
    ///
    /// Indexed images store the index of the closest palette entry (the first one on ties).
    /// Alpha-only images have nowhere to store a color and ignore the call.
    pub fn set_pixel_color(&mut self, x: Coord, y: Coord, color: Color) {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        match self.format {
            PixelFormat::TrueColor | PixelFormat::TrueColorChromaKeyed => {
                let offset = self.native_offset(x, y);
                let depth = self.depth;
                color.write_native(depth, &mut self.data[offset..]);
                if depth == ColorDepth::Depth32 {
                    self.data[offset + 3] = OPA_COVER;
                }
            }
            PixelFormat::TrueColorAlpha => {
                let offset = self.native_offset(x, y);
                color.write_native(self.depth, &mut self.data[offset..]);
            }
            PixelFormat::Alpha1
            | PixelFormat::Alpha2
            | PixelFormat::Alpha4
            | PixelFormat::Alpha8 => {}
            PixelFormat::Indexed1
            | PixelFormat::Indexed2
            | PixelFormat::Indexed4
            | PixelFormat::Indexed8 => {
                let index = self.closest_palette_index(color);
                self.write_packed(x, y, index);
            }
        }
    }

    /// Writes the opacity of a pixel without touching its color.
    ///
    /// Alpha-only formats keep the top `bpp` bits of `opa`. Formats without a per-pixel alpha
    /// store (true color, chroma keyed, indexed) ignore the call.
    pub fn set_pixel_alpha(&mut self, x: Coord, y: Coord, opa: Opa) {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        match self.format {
            PixelFormat::TrueColorAlpha => {
                let px_bytes = self.depth.alpha_pixel_bytes();
                let offset = self.native_offset(x, y) + px_bytes - 1;
                self.data[offset] = opa;
            }
            PixelFormat::Alpha1
            | PixelFormat::Alpha2
            | PixelFormat::Alpha4
            | PixelFormat::Alpha8 => {
                let value = opa >> (8 - self.bpp());
                self.write_packed(x, y, value);
            }
            PixelFormat::TrueColor
            | PixelFormat::TrueColorChromaKeyed
            | PixelFormat::Indexed1
            | PixelFormat::Indexed2
            | PixelFormat::Indexed4
            | PixelFormat::Indexed8 => {}
        }
    }

    /// Returns the raw palette index of a pixel, or `None` for non-indexed formats.
    pub fn pixel_index(&self, x: Coord, y: Coord) -> Option<u8> {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        self.format.is_indexed().then(|| self.read_packed(x, y))
    }

    /// Stores a raw palette index.
    pub fn set_pixel_index(&mut self, x: Coord, y: Coord, index: u8) -> Result<(), ImageError> {
        self.check_palette_index(index as usize)?;
        debug_assert!(self.contains(x, y), "({x}, {y}) outside {}x{}", self.width, self.height);
        self.write_packed(x, y, index);
        Ok(())
    }

    /// Reads palette entry `index`.
    pub fn palette_entry(&self, index: usize) -> Result<PaletteEntry, ImageError> {
        self.check_palette_index(index)?;
        Ok(self.read_palette(index))
    }

    /// Overwrites palette entry `index`. Pixel indices and other entries are left unchanged.
    pub fn set_palette_entry(
        &mut self,
        index: usize,
        entry: PaletteEntry,
    ) -> Result<(), ImageError> {
        self.check_palette_index(index)?;
        let base = index * PALETTE_ENTRY_BYTES;
        let PaletteEntry { color, opa } = entry;
        self.data[base..base + PALETTE_ENTRY_BYTES]
            .copy_from_slice(&[color.b, color.g, color.r, opa]);
        Ok(())
    }

    /// Sets every pixel to `color` and `opa` through the regular write paths.
    pub fn fill(&mut self, color: Color, opa: Opa) {
        if self.format.is_indexed() {
            let index = self.closest_palette_index(color);
            for y in 0..self.height {
                for x in 0..self.width {
                    self.write_packed(x, y, index);
                }
            }
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel_color(x, y, color);
                self.set_pixel_alpha(x, y, opa);
            }
        }
    }

    #[inline]
    fn bpp(&self) -> u32 {
        self.format.pixel_bits(self.depth) as u32
    }

    /// Byte offset of a true-color pixel.
    #[inline]
    fn native_offset(&self, x: Coord, y: Coord) -> usize {
        let px_bytes = match self.format {
            PixelFormat::TrueColorAlpha => self.depth.alpha_pixel_bytes(),
            _ => self.depth.bytes(),
        };
        (y as usize * self.width as usize + x as usize) * px_bytes
    }

    #[inline]
    pub(crate) fn read_native_raw(&self, x: Coord, y: Coord) -> u32 {
        Color::read_native(self.depth, &self.data[self.native_offset(x, y)..])
    }

    /// Byte, shift and mask of a bit-packed pixel.
    #[inline]
    fn packed_position(&self, x: Coord, y: Coord) -> PackedPosition {
        let bpp = self.bpp() as usize;
        let stride = (self.width as usize * bpp).div_ceil(8);
        let bit = x as usize * bpp;
        PackedPosition {
            byte: self.format.palette_bytes() + y as usize * stride + bit / 8,
            shift: (8 - bpp - bit % 8) as u32,
            mask: ((1u16 << bpp) - 1) as u8,
        }
    }

    #[inline]
    fn read_packed(&self, x: Coord, y: Coord) -> u8 {
        let pos = self.packed_position(x, y);
        (self.data[pos.byte] >> pos.shift) & pos.mask
    }

    #[inline]
    fn write_packed(&mut self, x: Coord, y: Coord, value: u8) {
        let pos = self.packed_position(x, y);
        let byte = &mut self.data[pos.byte];
        *byte = (*byte & !(pos.mask << pos.shift)) | ((value & pos.mask) << pos.shift);
    }

    #[inline]
    fn read_palette(&self, index: usize) -> PaletteEntry {
        let base = index * PALETTE_ENTRY_BYTES;
        let entry = &self.data[base..base + PALETTE_ENTRY_BYTES];
        PaletteEntry::new(Color::new(entry[2], entry[1], entry[0]), entry[3])
    }

    fn closest_palette_index(&self, color: Color) -> u8 {
        (0..self.format.palette_len())
            .min_by_key(|&i| self.read_palette(i).color.distance_sq(color))
            .unwrap_or(0) as u8
    }

    fn check_palette_index(&self, index: usize) -> Result<(), ImageError> {
        let len = self.format.palette_len();
        if len == 0 {
            log::debug!("palette access on a {:?} image", self.format);
            return Err(ImageError::NotIndexed(self.format));
        }
        if index >= len {
            return Err(ImageError::PaletteIndexOutOfRange { index, len });
        }
        Ok(())
    }
}
