//! Compact pixel-format codec and fixed-point image rotation for embedded displays.
//!
//! # Two Access Paths
//!
//! - **Direct access** ([`ImageDesc`]): read and write single pixels of true-color,
//!   alpha-only (1/2/4/8 bit), indexed (1/2/4/8 bit) and chroma-keyed images. Colors come back
//!   in one uniform representation ([`Color`] plus an [`Opa`] opacity) whatever the encoding.
//! - **Rotated sampling** ([`RotateSession`]): built once per rotated draw, then queried for
//!   every destination pixel. Uses fixed-point sine/cosine and nearest-neighbor sampling, with
//!   no floating point and no intermediate rotated image.
//!
//! Buffer sizes follow [`PixelFormat::buffer_size`], which callers can use to pre-size transfer
//! buffers.
//!
//! # Example
//!
//! ```
//! use embedded_pixels::{Color, ColorDepth, ImageDesc, PixelFormat, RotateSession};
//!
//! // An 8x8 image holding only 4-bit coverage.
//! let mut img = ImageDesc::allocate(8, 8, PixelFormat::Alpha4, ColorDepth::Depth16)?;
//! img.fill(Color::BLACK, 255);
//! assert_eq!(img.get_pixel_alpha(3, 3), 255);
//!
//! // Sample it rotated by 45 degrees around its center, tinted red.
//! let session = RotateSession::centered(&img, 450, Color::RED);
//! let area = session.bounding_box();
//! let mut covered = 0;
//! for y in area.y1..=area.y2 {
//!     for x in area.x1..=area.x2 {
//!         if let Some(px) = session.query(x, y) {
//!             assert_eq!(px.color, Color::RED);
//!             covered += 1;
//!         }
//!     }
//! }
//! assert!(covered > 0);
//! # Ok::<(), embedded_pixels::ImageError>(())
//! ```

#[doc(hidden)]
pub mod bench_utils;
mod color;
mod error;
mod format;
mod image;
mod op_rotate_image;
pub mod trigo;

pub use crate::color::{Color, ColorDepth, OPA_COVER, OPA_TRANSP, Opa, mix_opa};
pub use crate::error::ImageError;
pub use crate::format::{PALETTE_ENTRY_BYTES, PixelFormat};
pub use crate::image::{COORD_MAX, Coord, ImageDesc, PaletteEntry};
pub use crate::op_rotate_image::{Area, Point, RotateSession, SampledPixel};
