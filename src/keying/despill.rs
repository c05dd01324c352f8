use image::{Rgb, RgbImage};

/// Minimum green excess before a pixel is treated as contaminated.
/// Keeps near-neutral pixels from reacting to channel noise.
pub const SPILL_THRESHOLD: u8 = 20;

/// How far green rises above the stronger of red and blue, floored at 0
pub fn green_excess(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    g.saturating_sub(r.max(b))
}

/// Green value after removing `strength` of the spill from one pixel.
///
/// Pixels that are not green-dominant, or whose excess is at most
/// [`SPILL_THRESHOLD`], keep their green untouched.
pub fn despill_green(pixel: &Rgb<u8>, strength: f64) -> u8 {
    let green = pixel[1];
    let excess = green_excess(pixel);
    if excess <= SPILL_THRESHOLD {
        return green;
    }

    let amount = (f64::from(excess) * strength).floor() as u8;
    green - amount.min(excess)
}

/// Remove green spill across the whole image.
///
/// Red and blue are never modified. The correction is global rather than
/// confined to the matte edge, so green-dominant subject pixels are
/// corrected too.
pub fn despill(image: &RgbImage, strength: f64) -> RgbImage {
    let _span = tracing::debug_span!("despill", strength).entered();

    let mut corrected = image.clone();
    if strength <= 0.0 {
        return corrected;
    }

    let mut touched = 0usize;
    for pixel in corrected.pixels_mut() {
        let green = despill_green(pixel, strength);
        if green != pixel[1] {
            pixel[1] = green;
            touched += 1;
        }
    }
    tracing::debug!("Despilled {} pixels", touched);

    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excess_is_clamped_at_zero() {
        assert_eq!(green_excess(&Rgb([200, 100, 50])), 0);
        assert_eq!(green_excess(&Rgb([10, 100, 50])), 50);
        assert_eq!(green_excess(&Rgb([0, 200, 0])), 200);
    }

    #[test]
    fn zero_strength_is_a_no_op() {
        let image = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, 255 - (y * 20) as u8, 7]));
        assert_eq!(despill(&image, 0.0), image);
    }

    #[test]
    fn full_strength_removes_pure_green() {
        assert_eq!(despill_green(&Rgb([0, 200, 0]), 1.0), 0);
    }

    #[test]
    fn full_strength_levels_green_with_max_of_red_and_blue() {
        assert_eq!(despill_green(&Rgb([90, 180, 120]), 1.0), 120);
    }

    #[test]
    fn partial_strength_truncates_amount() {
        // excess 45, 45 * 0.5 = 22.5 -> 22
        assert_eq!(despill_green(&Rgb([100, 145, 30]), 0.5), 123);
        // excess 200, 200 * 0.7 = 140
        assert_eq!(despill_green(&Rgb([0, 200, 0]), 0.7), 60);
    }

    #[test]
    fn excess_at_threshold_is_left_alone() {
        assert_eq!(despill_green(&Rgb([100, 120, 100]), 1.0), 120);
        assert_eq!(despill_green(&Rgb([100, 121, 100]), 1.0), 100);
    }

    #[test]
    fn non_green_dominant_pixels_are_untouched() {
        let image = RgbImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgb([255, 255, 255]),
            (1, 0) => Rgb([200, 100, 30]),
            (0, 1) => Rgb([10, 40, 200]),
            _ => Rgb([128, 128, 128]),
        });
        assert_eq!(despill(&image, 1.0), image);
    }

    #[test]
    fn only_green_channel_changes() {
        let image = RgbImage::from_pixel(3, 3, Rgb([30, 220, 60]));
        let corrected = despill(&image, 1.0);
        for pixel in corrected.pixels() {
            assert_eq!(pixel.0, [30, 60, 60]);
        }
    }
}
