use super::types::{HsvBound, Mask, BACKGROUND, FOREGROUND};
use image::RgbImage;

/// Fractional bits of the fixed-point HSV division tables
const HSV_SHIFT: u32 = 12;

/// `table[i] = round(numerator / i)`, with `table[0] = 0`
const fn reciprocal_table(numerator: i32) -> [i32; 256] {
    let mut table = [0; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = (2 * numerator + i as i32) / (2 * i as i32);
        i += 1;
    }
    table
}

/// 255 / v in fixed point, for saturation
const SAT_DIV: [i32; 256] = reciprocal_table(255 << HSV_SHIFT);
/// 180 / (6 * diff) in fixed point, for hue on the half-degree scale
const HUE_DIV: [i32; 256] = reciprocal_table((180 << HSV_SHIFT) / 6);

/// Convert one RGB sample to 8-bit HSV.
///
/// Hue is on the half-degree scale (0..180) so it fits in a byte;
/// saturation and value span 0..=255. Achromatic pixels get hue 0.
/// Division goes through fixed-point reciprocal tables, so results match
/// the usual 8-bit converters to the last bit.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = i32::from(v - min);
    let round = 1 << (HSV_SHIFT - 1);

    let s = (diff * SAT_DIV[usize::from(v)] + round) >> HSV_SHIFT;

    let (ri, gi, bi) = (i32::from(r), i32::from(g), i32::from(b));
    // Sextant offset in units of diff, red checked first, then green
    let h = if v == r {
        gi - bi
    } else if v == g {
        bi - ri + 2 * diff
    } else {
        ri - gi + 4 * diff
    };
    let h = (h * HUE_DIV[diff as usize] + round) >> HSV_SHIFT;
    let h = if h < 0 { h + 180 } else { h };

    (h as u8, s as u8, v)
}

/// True when every component of `hsv` lies in the closed box `[lower, upper]`.
/// An inverted interval on any axis matches nothing.
pub fn in_range(hsv: (u8, u8, u8), lower: HsvBound, upper: HsvBound) -> bool {
    let (h, s, v) = hsv;
    (lower.h..=upper.h).contains(&h)
        && (lower.s..=upper.s).contains(&s)
        && (lower.v..=upper.v).contains(&v)
}

/// Mark every pixel whose HSV falls inside the configured box as background
pub fn classify(image: &RgbImage, lower: HsvBound, upper: HsvBound) -> Mask {
    let _span = tracing::debug_span!("classify").entered();

    let (width, height) = image.dimensions();
    let mut mask = Mask::zeros((height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        let hsv = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        mask[[y as usize, x as usize]] = if in_range(hsv, lower, upper) {
            BACKGROUND
        } else {
            FOREGROUND
        };
    }

    mask
}
