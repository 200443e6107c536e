//! Uniform in-memory color and opacity, and their native true-color encodings.
//!
//! # Native encodings
//!
//! ```text
//! Depth8   RGB332  1 byte   rrrgggbb
//! Depth16  RGB565  2 bytes  little endian, rrrrrggg gggbbbbb
//! Depth32  BGRA    4 bytes  b, g, r, a  (the fourth byte is the alpha slot)
//! ```
//!
//! Decoding widens narrow channels by bit replication so that full-scale channels map back to
//! 255 and zero stays zero.

/// Opacity, `OPA_TRANSP` (0) to `OPA_COVER` (255).
pub type Opa = u8;

/// Fully transparent.
pub const OPA_TRANSP: Opa = 0;

/// Fully opaque.
pub const OPA_COVER: Opa = 255;

/// 8-bit-per-channel color used by every read and write path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const LIME: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    /// Default chroma key of `TrueColorChromaKeyed` images.
    pub const CHROMA_KEY: Color = Color::LIME;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Packs the color into the native representation of `depth`.
    ///
    /// Two colors are equal on a display of this depth exactly when their encodings are equal.
    pub fn encode(self, depth: ColorDepth) -> u32 {
        let (r, g, b) = (self.r as u32, self.g as u32, self.b as u32);
        match depth {
            ColorDepth::Depth8 => ((r >> 5) << 5) | ((g >> 5) << 2) | (b >> 6),
            ColorDepth::Depth16 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
            ColorDepth::Depth32 => (r << 16) | (g << 8) | b,
        }
    }

    /// Expands a native value of `depth` back to 8 bits per channel.
    pub fn decode(raw: u32, depth: ColorDepth) -> Self {
        match depth {
            ColorDepth::Depth8 => {
                let r3 = ((raw >> 5) & 0x7) as u8;
                let g3 = ((raw >> 2) & 0x7) as u8;
                let b2 = (raw & 0x3) as u8;
                Color::new(widen3(r3), widen3(g3), b2 * 0x55)
            }
            ColorDepth::Depth16 => {
                let r5 = ((raw >> 11) & 0x1F) as u8;
                let g6 = ((raw >> 5) & 0x3F) as u8;
                let b5 = (raw & 0x1F) as u8;
                Color::new(
                    (r5 << 3) | (r5 >> 2),
                    (g6 << 2) | (g6 >> 4),
                    (b5 << 3) | (b5 >> 2),
                )
            }
            ColorDepth::Depth32 => Color::new((raw >> 16) as u8, (raw >> 8) as u8, raw as u8),
        }
    }

    /// Rounds the color to what `depth` can represent.
    pub fn quantize(self, depth: ColorDepth) -> Self {
        Self::decode(self.encode(depth), depth)
    }

    /// Writes the native color bytes (little endian) into `dst`.
    ///
    /// Exactly `depth.color_bytes()` bytes are written; the 32-bit alpha slot is left alone.
    #[inline]
    pub(crate) fn write_native(self, depth: ColorDepth, dst: &mut [u8]) {
        let raw = self.encode(depth).to_le_bytes();
        let n = depth.color_bytes();
        dst[..n].copy_from_slice(&raw[..n]);
    }

    /// Reads a native color value written by [`Color::write_native`].
    #[inline]
    pub(crate) fn read_native(depth: ColorDepth, src: &[u8]) -> u32 {
        let mut raw = [0u8; 4];
        let n = depth.color_bytes();
        raw[..n].copy_from_slice(&src[..n]);
        u32::from_le_bytes(raw)
    }

    /// Squared RGB distance, used to pick the closest palette entry.
    pub(crate) fn distance_sq(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

fn widen3(v: u8) -> u8 {
    (v << 5) | (v << 2) | (v >> 1)
}

/// Native true-color depth of the target display.
///
/// `Default` follows the `color-depth-*` cargo features and falls back to 32 bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    Depth8,
    Depth16,
    Depth32,
}

impl Default for ColorDepth {
    fn default() -> Self {
        if cfg!(feature = "color-depth-8") {
            ColorDepth::Depth8
        } else if cfg!(feature = "color-depth-16") {
            ColorDepth::Depth16
        } else {
            ColorDepth::Depth32
        }
    }
}

impl ColorDepth {
    /// Storage bits of one true-color pixel.
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::Depth8 => 8,
            ColorDepth::Depth16 => 16,
            ColorDepth::Depth32 => 32,
        }
    }

    /// Storage bytes of one true-color pixel.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Bytes that carry color channels. Smaller than [`bytes`](Self::bytes) only for 32 bits.
    pub fn color_bytes(self) -> usize {
        match self {
            ColorDepth::Depth8 => 1,
            ColorDepth::Depth16 => 2,
            ColorDepth::Depth32 => 3,
        }
    }

    /// Bytes of one `TrueColorAlpha` pixel: color followed by an alpha byte.
    ///
    /// At 32 bits the alpha byte is the fourth color byte, so no extra byte is needed.
    pub fn alpha_pixel_bytes(self) -> usize {
        match self {
            ColorDepth::Depth32 => 4,
            _ => self.bytes() + 1,
        }
    }
}

/// Scales opacity `a` by `b`, as a compositor does with a global opacity factor.
#[inline]
pub fn mix_opa(a: Opa, b: Opa) -> Opa {
    match (a, b) {
        (OPA_TRANSP, _) | (_, OPA_TRANSP) => OPA_TRANSP,
        (OPA_COVER, other) | (other, OPA_COVER) => other,
        _ => ((a as u16 * b as u16) >> 8) as Opa,
    }
}
