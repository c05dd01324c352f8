use super::types::AlphaMatte;
use crate::error::{ChromaKeyError, Result};
use image::{Rgba, RgbImage, RgbaImage};

/// Attach `alpha` to the color channels of `color`.
///
/// Both buffers come from the same input, so a size mismatch means a
/// broken pipeline and is reported as an internal consistency fault.
pub fn composite(color: &RgbImage, alpha: &AlphaMatte) -> Result<RgbaImage> {
    let _span = tracing::debug_span!("composite").entered();

    let (width, height) = color.dimensions();
    let (rows, cols) = alpha.dim();
    if (rows, cols) != (height as usize, width as usize) {
        return Err(ChromaKeyError::dimension_mismatch(
            "composite",
            (width, height),
            (cols as u32, rows as u32),
        ));
    }

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = color.get_pixel(x, y).0;
        Rgba([r, g, b, alpha[[y as usize, x as usize]]])
    }))
}

/// Alpha channel of a keyed image as a matte, indexed `[row, col]`
pub fn extract_alpha(image: &RgbaImage) -> AlphaMatte {
    let (width, height) = image.dimensions();
    AlphaMatte::from_shape_fn((height as usize, width as usize), |(row, col)| {
        image.get_pixel(col as u32, row as u32)[3]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn merges_color_and_alpha() {
        let color = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 9]));
        let alpha = AlphaMatte::from_shape_fn((2, 3), |(row, col)| (row * 10 + col) as u8);

        let rgba = composite(&color, &alpha).unwrap();

        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(2, 1).0, [2, 1, 9, 12]);
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 9, 0]);
        assert_eq!(extract_alpha(&rgba), alpha);
    }

    #[test]
    fn mismatched_dimensions_are_a_consistency_fault() {
        let color = RgbImage::new(3, 2);
        let alpha = AlphaMatte::zeros((3, 2));

        let err = composite(&color, &alpha).unwrap_err();

        assert!(matches!(err, ChromaKeyError::InternalConsistency(_)));
    }
}
