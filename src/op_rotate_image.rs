//! Per-pixel nearest-neighbor sampling of a rotated image.
//!
//! # Algorithm Overview
//!
//! 1. **Setup**: [`RotateSession::new`] normalizes the angle, looks up the fixed-point sine and
//!    cosine of the *negated* angle, scales the pivot by 256 and caches the source format's
//!    traits. Nothing is rasterized up front.
//!
//! 2. **Inverse mapping**: for every destination pixel the compositor asks
//!    [`RotateSession::query`], which rotates the offset from the pivot back into source space:
//!
//!    ```text
//!    xs = ((cos * xt - sin * yt) >> (TRIGO_SHIFT - 8)) + pivot_x * 256
//!    ys = ((sin * xt + cos * yt) >> (TRIGO_SHIFT - 8)) + pivot_y * 256
//!    ```
//!
//! 3. **Rounding**: the 1/256 pixel result is rounded to the nearest source pixel instead of
//!    truncated, which keeps edges free of one-pixel seams.
//!
//! 4. **Sampling**: coordinates outside the source yield no sample. Native-color sources are
//!    decoded directly; alpha-only and indexed sources go through the image accessors.
//!
//! [`RotateSession::bounding_box`] gives the destination area worth walking.

use crate::color::{Color, OPA_COVER, OPA_TRANSP, Opa};
use crate::image::{Coord, ImageDesc};
use crate::trigo::{TRIGO_SHIFT, TRIGO_SIN_MAX, cos_tenths, normalize_angle, sin_tenths};

/// Fractional bits of the pivot and the intermediate source coordinates.
const SUBPIXEL_SHIFT: u32 = 8;

/// Half a pixel in subpixel units, added before truncating to round to nearest.
const SUBPIXEL_HALF: i64 = 1 << (SUBPIXEL_SHIFT - 1);

/// Worst-case error of a sine or cosine coefficient, in table units: the table tops out one
/// below `2^TRIGO_SHIFT`, and interpolating tenths truncates by up to one more.
const TRIG_ERROR_LSB: i64 = 2 * ((1 << TRIGO_SHIFT) - TRIGO_SIN_MAX as i64);

/// A point in pixel coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// An inclusive rectangle, `x1..=x2` by `y1..=y2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Color and opacity sampled for one destination pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SampledPixel {
    pub color: Color,
    pub opa: Opa,
}

/// Precomputed state for drawing one rotated image.
///
/// The session borrows its source for its whole lifetime, so the image cannot be written while
/// any session samples it. Queries take `&self` and never allocate.
#[derive(Clone, Debug)]
pub struct RotateSession<'a> {
    src: &'a ImageDesc,
    angle: i32,
    pivot: Point,
    pivot_x_256: i64,
    pivot_y_256: i64,
    sinma: i64,
    cosma: i64,
    color: Color,
    chroma_key_raw: u32,
    has_alpha: bool,
    chroma_keyed: bool,
    native_color: bool,
}

impl<'a> RotateSession<'a> {
    /// Prepares sampling of `src` rotated by `angle` tenths of a degree around `pivot`.
    ///
    /// `color` tints alpha-only sources and replaces chroma-keyed pixels.
    pub fn new(src: &'a ImageDesc, angle: i32, pivot: Point, color: Color) -> Self {
        let angle = normalize_angle(angle);
        let format = src.format();
        log::trace!(
            "rotate session: {}x{} {format:?}, angle {angle}, pivot ({}, {})",
            src.width(),
            src.height(),
            pivot.x,
            pivot.y
        );
        Self {
            src,
            angle,
            pivot,
            pivot_x_256: (pivot.x as i64) << SUBPIXEL_SHIFT,
            pivot_y_256: (pivot.y as i64) << SUBPIXEL_SHIFT,
            sinma: sin_tenths(-angle) as i64,
            cosma: cos_tenths(-angle) as i64,
            color,
            chroma_key_raw: src.chroma_key().encode(src.depth()),
            has_alpha: format.has_alpha(),
            chroma_keyed: format.is_chroma_keyed(),
            native_color: format.is_native_color(),
        }
    }

    /// Rotation around the center of `src`.
    pub fn centered(src: &'a ImageDesc, angle: i32, color: Color) -> Self {
        let pivot = Point::new(src.width() / 2, src.height() / 2);
        Self::new(src, angle, pivot, color)
    }

    /// Normalized angle in tenths of a degree, `0..3600`.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    pub fn source(&self) -> &'a ImageDesc {
        self.src
    }

    /// Samples the source pixel that lands on destination (x, y).
    ///
    /// Returns `None` when the inverse-rotated point falls outside the source; the destination
    /// pixel must then be left untouched.
    #[inline]
    pub fn query(&self, x: i32, y: i32) -> Option<SampledPixel> {
        let xt = x as i64 - self.pivot.x as i64;
        let yt = y as i64 - self.pivot.y as i64;

        let xs = ((self.cosma * xt - self.sinma * yt) >> (TRIGO_SHIFT - SUBPIXEL_SHIFT))
            + self.pivot_x_256;
        let ys = ((self.sinma * xt + self.cosma * yt) >> (TRIGO_SHIFT - SUBPIXEL_SHIFT))
            + self.pivot_y_256;

        let xs_int = (xs + SUBPIXEL_HALF) >> SUBPIXEL_SHIFT;
        let ys_int = (ys + SUBPIXEL_HALF) >> SUBPIXEL_SHIFT;
        if xs_int < 0
            || ys_int < 0
            || xs_int >= self.src.width() as i64
            || ys_int >= self.src.height() as i64
        {
            return None;
        }

        Some(self.sample(xs_int as Coord, ys_int as Coord))
    }

    #[inline]
    fn sample(&self, x: Coord, y: Coord) -> SampledPixel {
        if !self.native_color {
            return SampledPixel {
                color: self.src.get_pixel_color(x, y, self.color),
                opa: self.src.get_pixel_alpha(x, y),
            };
        }

        let raw = self.src.read_native_raw(x, y);
        if self.chroma_keyed && raw == self.chroma_key_raw {
            return SampledPixel {
                color: self.color,
                opa: OPA_TRANSP,
            };
        }
        let opa = if self.has_alpha {
            self.src.get_pixel_alpha(x, y)
        } else {
            OPA_COVER
        };
        SampledPixel {
            color: Color::decode(raw, self.src.depth()),
            opa,
        }
    }

    /// Destination area covering every pixel for which [`query`](Self::query) can return a
    /// sample.
    ///
    /// The rotated corners are padded by one pixel to absorb nearest-neighbor rounding, plus the
    /// drift of the fixed-point trigonometry, which grows with the distance from the pivot. At
    /// multiples of 90 degrees only the drift is added.
    pub fn bounding_box(&self) -> Area {
        let w = self.src.width() as i64;
        let h = self.src.height() as i64;
        if w == 0 || h == 0 {
            return Area {
                x1: self.pivot.x as i32,
                y1: self.pivot.y as i32,
                x2: self.pivot.x as i32 - 1,
                y2: self.pivot.y as i32 - 1,
            };
        }

        let corners = [(0, 0), (w - 1, 0), (w - 1, h - 1), (0, h - 1)];
        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;
        let mut max_offset = 0;
        for (cx, cy) in corners {
            let offset = (cx - self.pivot.x as i64).abs() + (cy - self.pivot.y as i64).abs();
            max_offset = max_offset.max(offset);
            let (nx, ny) = self.forward_256(cx, cy);
            min_x = min_x.min(nx);
            min_y = min_y.min(ny);
            max_x = max_x.max(nx);
            max_y = max_y.max(ny);
        }

        let full = 1i64 << SUBPIXEL_SHIFT;
        // Both the forward corner mapping and the inverse query drift by up to
        // TRIG_ERROR_LSB / 2^15 of the offset.
        let drift_256 = (2 * max_offset * TRIG_ERROR_LSB) >> (TRIGO_SHIFT - SUBPIXEL_SHIFT);
        let drift = (drift_256 + full - 1) >> SUBPIXEL_SHIFT;
        let rounding = if self.angle % 900 == 0 { 0 } else { 1 };
        let pad = rounding + drift;
        Area {
            x1: ((min_x >> SUBPIXEL_SHIFT) - pad) as i32,
            y1: ((min_y >> SUBPIXEL_SHIFT) - pad) as i32,
            x2: (((max_x + full - 1) >> SUBPIXEL_SHIFT) + pad) as i32,
            y2: (((max_y + full - 1) >> SUBPIXEL_SHIFT) + pad) as i32,
        }
    }

    /// Forward rotation of a source pixel, in 1/256 pixel units.
    ///
    /// `sinma` holds `sin(-angle)`, so the forward sine is its negation.
    fn forward_256(&self, x: i64, y: i64) -> (i64, i64) {
        let xt = x - self.pivot.x as i64;
        let yt = y - self.pivot.y as i64;
        let shift = TRIGO_SHIFT - SUBPIXEL_SHIFT;
        let nx = ((self.cosma * xt + self.sinma * yt) >> shift) + self.pivot_x_256;
        let ny = ((self.cosma * yt - self.sinma * xt) >> shift) + self.pivot_y_256;
        (nx, ny)
    }
}
