//! Fixed-point trigonometry for angles in tenths of a degree.
//!
//! Results are scaled by [`TRIGO_SIN_MAX`]; shifting a product right by [`TRIGO_SHIFT`] removes
//! the scale again. Whole degrees come from a quarter-wave table, tenths are interpolated
//! linearly between neighbouring degrees.

/// Value of `sin(90°)` in fixed point.
pub const TRIGO_SIN_MAX: i32 = 32767;

/// Right shift that divides out [`TRIGO_SIN_MAX`] (approximately `2^15`).
pub const TRIGO_SHIFT: u32 = 15;

/// Number of angle units in a full turn.
pub const ANGLE_FULL_TURN: i32 = 3600;

/// `round(32767 * sin(d))` for `d` in 0..=90 degrees.
const SIN_TABLE: [i16; 91] = [
    0, 572, 1144, 1715, 2286, 2856, 3425, 3993, 4560, 5126,
    5690, 6252, 6813, 7371, 7927, 8481, 9032, 9580, 10126, 10668,
    11207, 11743, 12275, 12803, 13328, 13848, 14364, 14876, 15383, 15886,
    16383, 16876, 17364, 17846, 18323, 18794, 19260, 19720, 20173, 20621,
    21062, 21497, 21925, 22347, 22762, 23170, 23571, 23964, 24351, 24730,
    25101, 25465, 25821, 26169, 26509, 26841, 27165, 27481, 27788, 28087,
    28377, 28659, 28932, 29196, 29451, 29697, 29934, 30162, 30381, 30591,
    30791, 30982, 31163, 31335, 31498, 31650, 31794, 31927, 32051, 32165,
    32269, 32364, 32448, 32523, 32587, 32642, 32687, 32722, 32747, 32762,
    32767,
];

/// Maps any angle in tenths of a degree into `0..3600`.
#[inline]
pub fn normalize_angle(angle: i32) -> i32 {
    angle.rem_euclid(ANGLE_FULL_TURN)
}

/// Sine of a whole number of degrees, scaled by [`TRIGO_SIN_MAX`].
fn sin_degrees(degrees: i32) -> i32 {
    let d = degrees.rem_euclid(360) as usize;
    match d {
        0..=90 => SIN_TABLE[d] as i32,
        91..=180 => SIN_TABLE[180 - d] as i32,
        181..=270 => -(SIN_TABLE[d - 180] as i32),
        _ => -(SIN_TABLE[360 - d] as i32),
    }
}

/// Sine of `angle` tenths of a degree, scaled by [`TRIGO_SIN_MAX`].
pub fn sin_tenths(angle: i32) -> i32 {
    let angle = normalize_angle(angle);
    let degrees = angle / 10;
    let tenths = angle % 10;
    let lo = sin_degrees(degrees);
    if tenths == 0 {
        return lo;
    }
    let hi = sin_degrees(degrees + 1);
    lo + (hi - lo) * tenths / 10
}

/// Cosine of `angle` tenths of a degree, scaled by [`TRIGO_SIN_MAX`].
#[inline]
pub fn cos_tenths(angle: i32) -> i32 {
    sin_tenths(angle + 900)
}
