use embedded_pixels::{
    COORD_MAX, Color, ColorDepth, Coord, ImageDesc, ImageError, OPA_COVER, OPA_TRANSP,
    PaletteEntry, PixelFormat,
};
use proptest::prelude::*;

const DEPTHS: [ColorDepth; 3] = [ColorDepth::Depth8, ColorDepth::Depth16, ColorDepth::Depth32];

const ALPHA_FORMATS: [PixelFormat; 4] = [
    PixelFormat::Alpha1,
    PixelFormat::Alpha2,
    PixelFormat::Alpha4,
    PixelFormat::Alpha8,
];

const INDEXED_FORMATS: [PixelFormat; 4] = [
    PixelFormat::Indexed1,
    PixelFormat::Indexed2,
    PixelFormat::Indexed4,
    PixelFormat::Indexed8,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn alloc(width: Coord, height: Coord, format: PixelFormat, depth: ColorDepth) -> ImageDesc {
    ImageDesc::allocate(width, height, format, depth).expect("allocation")
}

/// Palette with visually distinct colors and opacities.
fn fill_palette(img: &mut ImageDesc) {
    let len = img.format().palette_len();
    for i in 0..len {
        let entry = PaletteEntry::new(
            Color::new((i * 37) as u8, (255 - i) as u8, (i * 11 + 5) as u8),
            (i * 255 / (len - 1)) as u8,
        );
        img.set_palette_entry(i, entry).expect("palette");
    }
}

fn expected_size(format: PixelFormat, w: usize, h: usize, depth: ColorDepth) -> usize {
    let px = depth.bits() as usize / 8;
    match format {
        PixelFormat::TrueColor | PixelFormat::TrueColorChromaKeyed => px * w * h,
        PixelFormat::TrueColorAlpha => {
            let alpha_px = if depth == ColorDepth::Depth32 { 4 } else { px + 1 };
            alpha_px * w * h
        }
        PixelFormat::Alpha1 => (w / 8 + 1) * h,
        PixelFormat::Alpha2 => (w / 4 + 1) * h,
        PixelFormat::Alpha4 => (w / 2 + 1) * h,
        PixelFormat::Alpha8 => w * h,
        PixelFormat::Indexed1 => (w / 8 + 1) * h + 4 * 2,
        PixelFormat::Indexed2 => (w / 4 + 1) * h + 4 * 4,
        PixelFormat::Indexed4 => (w / 2 + 1) * h + 4 * 16,
        PixelFormat::Indexed8 => w * h + 4 * 256,
    }
}

#[test]
fn test_buffer_size_formula_edges() {
    for depth in DEPTHS {
        for format in PixelFormat::ALL {
            for (w, h) in [(1, 1), (7, 1), (8, 1), (9, 3), (8192, 8192)] {
                assert_eq!(
                    format.buffer_size(w, h, depth),
                    expected_size(format, w as usize, h as usize, depth),
                    "{format:?} {w}x{h} at {depth:?}"
                );
            }
        }
    }
}

#[test]
fn test_buffer_size_large_values() {
    let d = ColorDepth::Depth16;
    assert_eq!(PixelFormat::TrueColor.buffer_size(8192, 8192, d), 2 * 8192 * 8192);
    assert_eq!(PixelFormat::Alpha1.buffer_size(8192, 8192, d), 1025 * 8192);
    assert_eq!(PixelFormat::Indexed8.buffer_size(8192, 8192, d), 8192 * 8192 + 1024);
}

#[test]
fn test_allocate_matches_formula_and_is_zeroed() {
    init_logger();
    for depth in DEPTHS {
        for format in PixelFormat::ALL {
            let img = alloc(13, 5, format, depth);
            assert_eq!(img.as_bytes().len(), format.buffer_size(13, 5, depth));
            assert!(img.as_bytes().iter().all(|b| *b == 0));
            assert_eq!((img.width(), img.height()), (13, 5));
            assert_eq!(img.format(), format);
            assert_eq!(img.depth(), depth);
            img.free();
        }
    }
}

#[test]
fn test_allocate_rejects_negative_dimensions() {
    init_logger();
    let err = ImageDesc::allocate(-1, 4, PixelFormat::TrueColor, ColorDepth::Depth16).unwrap_err();
    assert_eq!(
        err,
        ImageError::InvalidDimensions {
            width: -1,
            height: 4
        }
    );
}

#[test]
fn test_buffer_size_at_coord_max() {
    let d = ColorDepth::Depth32;
    let side = COORD_MAX as usize;
    assert_eq!(PixelFormat::TrueColor.buffer_size(COORD_MAX, COORD_MAX, d), 4 * side * side);
    assert_eq!(PixelFormat::Indexed1.buffer_size(COORD_MAX, 1, d), side / 8 + 1 + 2 * 4);
}

#[test]
fn test_allocate_zero_sized() {
    let img = alloc(0, 0, PixelFormat::TrueColorAlpha, ColorDepth::Depth32);
    assert!(img.as_bytes().is_empty());
    let img = alloc(0, 0, PixelFormat::Indexed2, ColorDepth::Depth32);
    assert_eq!(img.as_bytes().len(), 16);
}

#[test]
fn test_from_bytes_checks_length() {
    let depth = ColorDepth::Depth16;
    let size = PixelFormat::Alpha2.buffer_size(5, 2, depth);
    let img = ImageDesc::from_bytes(5, 2, PixelFormat::Alpha2, depth, vec![0xFF; size]).unwrap();
    assert_eq!(img.get_pixel_alpha(4, 1), OPA_COVER);

    let err =
        ImageDesc::from_bytes(5, 2, PixelFormat::Alpha2, depth, vec![0; size - 1]).unwrap_err();
    assert_eq!(
        err,
        ImageError::BufferSizeMismatch {
            format: PixelFormat::Alpha2,
            expected: size,
            actual: size - 1
        }
    );
}

#[test]
fn test_from_bytes_decodes_rgb565() {
    // Two pixels: red then blue, little endian.
    let bytes = vec![0x00, 0xF8, 0x1F, 0x00];
    let img =
        ImageDesc::from_bytes(2, 1, PixelFormat::TrueColor, ColorDepth::Depth16, bytes).unwrap();
    assert_eq!(img.get_pixel_color(0, 0, Color::BLACK), Color::RED);
    assert_eq!(img.get_pixel_color(1, 0, Color::BLACK), Color::BLUE);
    assert_eq!(img.get_pixel_alpha(1, 0), OPA_COVER);
}

#[test]
fn test_true_color_round_trip() {
    for depth in DEPTHS {
        for format in [
            PixelFormat::TrueColor,
            PixelFormat::TrueColorAlpha,
            PixelFormat::TrueColorChromaKeyed,
        ] {
            let mut img = alloc(4, 3, format, depth);
            let color = Color::from_hex(0x4080C0).quantize(depth);
            img.set_pixel_color(2, 1, color);
            assert_eq!(img.get_pixel_color(2, 1, Color::BLACK), color, "{format:?} {depth:?}");
            assert_eq!(img.get_pixel_color(1, 1, Color::WHITE), Color::BLACK);
        }
    }
}

#[test]
fn test_true_color_alpha_channels_are_independent() {
    for depth in DEPTHS {
        let mut img = alloc(3, 3, PixelFormat::TrueColorAlpha, depth);
        img.set_pixel_alpha(1, 2, 77);
        img.set_pixel_color(1, 2, Color::WHITE);
        assert_eq!(img.get_pixel_alpha(1, 2), 77);
        img.set_pixel_alpha(1, 2, 200);
        assert_eq!(img.get_pixel_color(1, 2, Color::BLACK), Color::WHITE);
        assert_eq!(img.get_pixel_alpha(1, 2), 200);
        // Neighbours untouched.
        assert_eq!(img.get_pixel_alpha(0, 2), 0);
        assert_eq!(img.get_pixel_alpha(2, 2), 0);
    }
}

#[test]
fn test_true_color_is_opaque_and_ignores_alpha_writes() {
    let mut img = alloc(2, 2, PixelFormat::TrueColor, ColorDepth::Depth32);
    img.set_pixel_color(0, 0, Color::RED);
    let before = img.as_bytes().to_vec();
    img.set_pixel_alpha(0, 0, 10);
    assert_eq!(img.as_bytes(), before.as_slice());
    assert_eq!(img.get_pixel_alpha(0, 0), OPA_COVER);
}

#[test]
fn test_chroma_key_is_transparent_everywhere() {
    for depth in DEPTHS {
        let mut img = alloc(5, 4, PixelFormat::TrueColorChromaKeyed, depth);
        img.fill(Color::CHROMA_KEY, OPA_COVER);
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(img.get_pixel_alpha(x, y), OPA_TRANSP);
            }
        }
        img.set_pixel_color(3, 2, Color::RED);
        assert_eq!(img.get_pixel_alpha(3, 2), OPA_COVER);
    }
}

#[test]
fn test_chroma_key_compares_native_encoding() {
    // Depth16 cannot tell these apart, so both are keyed.
    let mut img = alloc(2, 1, PixelFormat::TrueColorChromaKeyed, ColorDepth::Depth16);
    img.set_pixel_color(0, 0, Color::new(0, 255, 0));
    img.set_pixel_color(1, 0, Color::new(3, 254, 2));
    assert_eq!(img.get_pixel_alpha(0, 0), OPA_TRANSP);
    assert_eq!(img.get_pixel_alpha(1, 0), OPA_TRANSP);
}

#[test]
fn test_custom_chroma_key() {
    let mut img = alloc(2, 1, PixelFormat::TrueColorChromaKeyed, ColorDepth::Depth32)
        .with_chroma_key(Color::BLUE);
    img.set_pixel_color(0, 0, Color::BLUE);
    img.set_pixel_color(1, 0, Color::LIME);
    assert_eq!(img.chroma_key(), Color::BLUE);
    assert_eq!(img.get_pixel_alpha(0, 0), OPA_TRANSP);
    assert_eq!(img.get_pixel_alpha(1, 0), OPA_COVER);
}

#[test]
fn test_alpha4_filled_with_max() {
    let mut img = alloc(8, 8, PixelFormat::Alpha4, ColorDepth::Depth16);
    for y in 0..8 {
        for x in 0..8 {
            img.set_pixel_alpha(x, y, 0xF0);
        }
    }
    let tint = Color::from_hex(0x336699);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(img.get_pixel_alpha(x, y), 255);
            assert_eq!(img.get_pixel_color(x, y, tint), tint);
        }
    }
}

#[test]
fn test_alpha_scale_is_even() {
    let mut img = alloc(4, 1, PixelFormat::Alpha2, ColorDepth::Depth16);
    for (x, opa) in [0u8, 64, 128, 192].into_iter().enumerate() {
        img.set_pixel_alpha(x as Coord, 0, opa);
    }
    let read: Vec<u8> = (0..4).map(|x| img.get_pixel_alpha(x, 0)).collect();
    assert_eq!(read, vec![0, 85, 170, 255]);

    let mut img = alloc(2, 1, PixelFormat::Alpha1, ColorDepth::Depth16);
    img.set_pixel_alpha(0, 0, 127);
    img.set_pixel_alpha(1, 0, 128);
    assert_eq!(img.get_pixel_alpha(0, 0), 0);
    assert_eq!(img.get_pixel_alpha(1, 0), 255);
}

#[test]
fn test_alpha_only_ignores_color_writes() {
    for format in ALPHA_FORMATS {
        let mut img = alloc(9, 2, format, ColorDepth::Depth32);
        img.set_pixel_alpha(8, 1, 255);
        let before = img.as_bytes().to_vec();
        img.set_pixel_color(8, 1, Color::RED);
        img.set_pixel_color(0, 0, Color::WHITE);
        assert_eq!(img.as_bytes(), before.as_slice());
        assert_eq!(img.get_pixel_color(8, 1, Color::BLUE), Color::BLUE);
        assert_eq!(img.get_pixel_alpha(8, 1), 255);
        assert_eq!(img.get_pixel_alpha(7, 1), 0);
    }
}

#[test]
fn test_indexed_color_lookup() {
    for format in INDEXED_FORMATS {
        let mut img = alloc(11, 3, format, ColorDepth::Depth16);
        fill_palette(&mut img);
        let last = format.palette_len() - 1;
        let entry = img.palette_entry(last).unwrap();

        img.set_pixel_color(10, 2, entry.color);
        assert_eq!(img.pixel_index(10, 2), Some(last as u8));
        assert_eq!(img.get_pixel_color(10, 2, Color::BLACK), entry.color);
        assert_eq!(img.get_pixel_alpha(10, 2), entry.opa);

        // Untouched pixels reference entry 0.
        let first = img.palette_entry(0).unwrap();
        assert_eq!(img.get_pixel_color(9, 2, Color::WHITE), first.color);
        assert_eq!(img.get_pixel_alpha(9, 2), first.opa);
    }
}

#[test]
fn test_indexed_alpha_writes_are_ignored() {
    let mut img = alloc(4, 4, PixelFormat::Indexed2, ColorDepth::Depth32);
    fill_palette(&mut img);
    img.set_pixel_index(1, 1, 2).unwrap();
    let before = img.as_bytes().to_vec();
    img.set_pixel_alpha(1, 1, 0);
    assert_eq!(img.as_bytes(), before.as_slice());
}

#[test]
fn test_palette_entry_errors() {
    let mut img = alloc(2, 2, PixelFormat::Indexed1, ColorDepth::Depth32);
    assert_eq!(
        img.set_palette_entry(2, PaletteEntry::default()),
        Err(ImageError::PaletteIndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        img.set_pixel_index(0, 0, 2),
        Err(ImageError::PaletteIndexOutOfRange { index: 2, len: 2 })
    );

    let mut img = alloc(2, 2, PixelFormat::TrueColor, ColorDepth::Depth32);
    assert_eq!(
        img.palette_entry(0),
        Err(ImageError::NotIndexed(PixelFormat::TrueColor))
    );
    assert_eq!(
        img.set_palette_entry(0, PaletteEntry::default()),
        Err(ImageError::NotIndexed(PixelFormat::TrueColor))
    );
    assert_eq!(img.pixel_index(0, 0), None);
}

#[test]
fn test_palette_write_keeps_indices() {
    let mut img = alloc(6, 6, PixelFormat::Indexed4, ColorDepth::Depth16);
    fill_palette(&mut img);
    for y in 0..6 {
        for x in 0..6 {
            img.set_pixel_index(x, y, ((x + y) % 16) as u8).unwrap();
        }
    }
    img.set_palette_entry(5, PaletteEntry::new(Color::WHITE, 9)).unwrap();
    for y in 0..6 {
        for x in 0..6 {
            assert_eq!(img.pixel_index(x, y), Some(((x + y) % 16) as u8));
        }
    }
    assert_eq!(img.get_pixel_color(2, 3, Color::BLACK), Color::WHITE);
    assert_eq!(img.get_pixel_alpha(3, 2), 9);
}

#[test]
fn test_fill_indexed_uses_closest_entry() {
    let mut img = alloc(3, 3, PixelFormat::Indexed1, ColorDepth::Depth32);
    img.set_palette_entry(0, PaletteEntry::opaque(Color::BLACK)).unwrap();
    img.set_palette_entry(1, PaletteEntry::new(Color::WHITE, 128)).unwrap();
    img.fill(Color::new(250, 240, 245), OPA_COVER);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(img.pixel_index(x, y), Some(1));
            assert_eq!(img.get_pixel_alpha(x, y), 128);
        }
    }
}

proptest! {
    #[test]
    fn prop_buffer_size_monotonic(
        w in 0i16..2048,
        h in 0i16..2048,
        dw in 0i16..64,
        dh in 0i16..64,
    ) {
        for depth in DEPTHS {
            for format in PixelFormat::ALL {
                let base = format.buffer_size(w, h, depth);
                prop_assert!(format.buffer_size(w + dw, h, depth) >= base);
                prop_assert!(format.buffer_size(w, h + dh, depth) >= base);
            }
        }
    }

    #[test]
    fn prop_alpha_round_trip_within_one_step(
        x in 0i16..13,
        y in 0i16..5,
        opa in any::<u8>(),
    ) {
        for format in ALPHA_FORMATS {
            let mut img = alloc(13, 5, format, ColorDepth::Depth16);
            img.set_pixel_alpha(x, y, opa);
            let got = img.get_pixel_alpha(x, y) as i32;
            let bits = format.pixel_bits(ColorDepth::Depth16) as i32;
            let step = 255 / ((1 << bits) - 1);
            if bits == 8 {
                prop_assert_eq!(got, opa as i32);
            } else {
                prop_assert!((got - opa as i32).abs() <= step, "{:?}: {} -> {}", format, opa, got);
            }
        }

        let mut img = alloc(13, 5, PixelFormat::TrueColorAlpha, ColorDepth::Depth16);
        img.set_pixel_alpha(x, y, opa);
        prop_assert_eq!(img.get_pixel_alpha(x, y), opa);
    }

    #[test]
    fn prop_packed_writes_are_local(
        x in 0i16..17,
        y in 0i16..3,
        index in any::<u8>(),
    ) {
        for format in INDEXED_FORMATS {
            let mut img = alloc(17, 3, format, ColorDepth::Depth32);
            fill_palette(&mut img);
            let index = (index as usize % format.palette_len()) as u8;
            img.set_pixel_index(x, y, index).unwrap();
            for yy in 0..3 {
                for xx in 0..17 {
                    let expected = if (xx, yy) == (x, y) { index } else { 0 };
                    prop_assert_eq!(img.pixel_index(xx, yy), Some(expected));
                }
            }
        }
    }

    #[test]
    fn prop_palette_entries_independent(
        i in 0usize..256,
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        opa in any::<u8>(),
    ) {
        let mut img = alloc(4, 4, PixelFormat::Indexed8, ColorDepth::Depth32);
        fill_palette(&mut img);
        let before: Vec<PaletteEntry> = (0..256).map(|j| img.palette_entry(j).unwrap()).collect();
        let entry = PaletteEntry::new(Color::new(r, g, b), opa);
        img.set_palette_entry(i, entry).unwrap();
        for j in 0..256 {
            let expected = if j == i { entry } else { before[j] };
            prop_assert_eq!(img.palette_entry(j).unwrap(), expected);
        }
    }

    #[test]
    fn prop_true_color_round_trip(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        opa in any::<u8>(),
    ) {
        for depth in DEPTHS {
            let color = Color::new(r, g, b).quantize(depth);
            let mut img = alloc(3, 2, PixelFormat::TrueColorAlpha, depth);
            img.set_pixel_alpha(2, 1, opa);
            img.set_pixel_color(2, 1, color);
            prop_assert_eq!(img.get_pixel_color(2, 1, Color::BLACK), color);
            prop_assert_eq!(img.get_pixel_alpha(2, 1), opa);
        }
    }
}
