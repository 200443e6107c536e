//! Shared helpers for benchmark drivers.

use crate::{Color, ColorDepth, Coord, ImageDesc, PaletteEntry, PixelFormat};

pub const BENCH_SIZES: [Coord; 4] = [32, 64, 128, 256];
pub const BENCH_FORMATS: [PixelFormat; 4] = [
    PixelFormat::TrueColor,
    PixelFormat::TrueColorAlpha,
    PixelFormat::Alpha4,
    PixelFormat::Indexed4,
];
pub const BENCH_ANGLES: [i32; 5] = [0, 150, 450, 900, 1800];

/// Builds a gradient test image; indexed images get a 16-step gray palette.
pub fn create_test_image(width: Coord, height: Coord, format: PixelFormat) -> ImageDesc {
    let mut img = match ImageDesc::allocate(width, height, format, ColorDepth::Depth16) {
        Ok(img) => img,
        Err(err) => panic!("benchmark image: {err}"),
    };
    for i in 0..format.palette_len() {
        let level = (i * 255 / (format.palette_len() - 1)) as u8;
        let entry = PaletteEntry::opaque(Color::new(level, level, level));
        if let Err(err) = img.set_palette_entry(i, entry) {
            panic!("benchmark palette: {err}");
        }
    }
    let span = (width as i32 + height as i32).max(1);
    for y in 0..height {
        for x in 0..width {
            let level = ((x as i32 + y as i32) * 255 / span) as u8;
            img.set_pixel_color(x, y, Color::new(level, 255 - level, level / 2));
            img.set_pixel_alpha(x, y, level);
        }
    }
    img
}

pub fn format_to_string(format: PixelFormat) -> &'static str {
    match format {
        PixelFormat::TrueColor => "TRUE_COLOR",
        PixelFormat::TrueColorAlpha => "TRUE_COLOR_ALPHA",
        PixelFormat::TrueColorChromaKeyed => "TRUE_COLOR_CHROMA_KEYED",
        PixelFormat::Alpha1 => "ALPHA_1",
        PixelFormat::Alpha2 => "ALPHA_2",
        PixelFormat::Alpha4 => "ALPHA_4",
        PixelFormat::Alpha8 => "ALPHA_8",
        PixelFormat::Indexed1 => "INDEXED_1",
        PixelFormat::Indexed2 => "INDEXED_2",
        PixelFormat::Indexed4 => "INDEXED_4",
        PixelFormat::Indexed8 => "INDEXED_8",
    }
}
