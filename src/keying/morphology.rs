use super::types::Mask;

/// Apply `erode_iterations` erosions followed by `dilate_iterations`
/// dilations, both with a 3x3 square structuring element.
///
/// Erosion clears background specks inside the subject; the dilation
/// afterwards pushes the background back out over anti-aliased edges.
pub fn refine(mut mask: Mask, erode_iterations: u32, dilate_iterations: u32) -> Mask {
    let _span = tracing::debug_span!(
        "refine",
        erode = erode_iterations,
        dilate = dilate_iterations
    )
    .entered();

    for _ in 0..erode_iterations {
        mask = erode(&mask);
    }
    for _ in 0..dilate_iterations {
        mask = dilate(&mask);
    }
    mask
}

/// One 3x3 erosion pass (neighborhood minimum)
pub fn erode(mask: &Mask) -> Mask {
    filter_3x3(mask, u8::MAX, u8::min)
}

/// One 3x3 dilation pass (neighborhood maximum)
pub fn dilate(mask: &Mask) -> Mask {
    filter_3x3(mask, u8::MIN, u8::max)
}

/// Fold `combine` over the in-bounds part of every 3x3 neighborhood.
/// Samples outside the image never take part.
fn filter_3x3(mask: &Mask, identity: u8, combine: fn(u8, u8) -> u8) -> Mask {
    let (rows, cols) = mask.dim();

    Mask::from_shape_fn((rows, cols), |(row, col)| {
        let row_range = row.saturating_sub(1)..=(row + 1).min(rows - 1);
        let col_range = col.saturating_sub(1)..=(col + 1).min(cols - 1);

        row_range.fold(identity, |acc, r| {
            col_range
                .clone()
                .fold(acc, |acc, c| combine(acc, mask[[r, c]]))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::types::{BACKGROUND, FOREGROUND};

    fn speck_mask() -> Mask {
        let mut mask = Mask::from_elem((9, 9), FOREGROUND);
        mask[[4, 4]] = BACKGROUND;
        mask
    }

    #[test]
    fn erosion_removes_isolated_background_speck() {
        let eroded = erode(&speck_mask());
        assert!(eroded.iter().all(|&m| m == FOREGROUND));
    }

    #[test]
    fn dilation_grows_background_by_one_ring() {
        let dilated = dilate(&speck_mask());
        for row in 0..9 {
            for col in 0..9 {
                let inside = (3..=5).contains(&row) && (3..=5).contains(&col);
                let expected = if inside { BACKGROUND } else { FOREGROUND };
                assert_eq!(dilated[[row, col]], expected, "at ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn equal_erode_and_dilate_removes_speck() {
        let refined = refine(speck_mask(), 1, 1);
        assert!(refined.iter().all(|&m| m == FOREGROUND));
    }

    #[test]
    fn large_background_interior_survives_open() {
        let mut mask = Mask::from_elem((12, 12), FOREGROUND);
        for row in 2..10 {
            for col in 2..10 {
                mask[[row, col]] = BACKGROUND;
            }
        }

        let refined = refine(mask.clone(), 2, 2);

        for row in 4..8 {
            for col in 4..8 {
                assert_eq!(refined[[row, col]], BACKGROUND);
            }
        }
        assert_eq!(refined, mask);
    }

    #[test]
    fn image_border_does_not_erode_background() {
        let mask = Mask::from_elem((4, 4), BACKGROUND);
        assert_eq!(erode(&mask), mask);
        assert_eq!(dilate(&Mask::from_elem((4, 4), FOREGROUND)), Mask::from_elem((4, 4), FOREGROUND));
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mask = speck_mask();
        assert_eq!(refine(mask.clone(), 0, 0), mask);
    }

    #[test]
    fn single_pixel_mask_is_stable() {
        let mask = Mask::from_elem((1, 1), BACKGROUND);
        assert_eq!(refine(mask.clone(), 3, 3), mask);
    }
}
