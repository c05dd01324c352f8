use super::types::{AlphaMatte, Mask};
use ndarray::{Array2, Axis};

/// Absorbs float error from kernels that sum to 1 only approximately,
/// so uniform regions rescale to their exact byte value.
const RESCALE_TOLERANCE: f32 = 1e-4;

/// Invert the refined mask into an alpha matte and soften its edges.
///
/// `kernel_size` is the already-odd blur size; `None` keeps the hard edge.
pub fn synthesize_alpha(mask: &Mask, kernel_size: Option<usize>) -> AlphaMatte {
    let _span = tracing::debug_span!("feather", kernel = ?kernel_size).entered();

    let raw = mask.mapv(|m| !m);
    let Some(size) = kernel_size else {
        return raw;
    };

    let kernel = smoothing_kernel(size);
    let alpha = raw.mapv(|a| f32::from(a) / 255.0);
    let alpha = convolve_axis(&alpha, &kernel, Axis(1));
    let alpha = convolve_axis(&alpha, &kernel, Axis(0));

    alpha.mapv(|a| (a * 255.0 + RESCALE_TOLERANCE).floor().clamp(0.0, 255.0) as u8)
}

/// Normalized 1-D smoothing kernel of odd length `size`.
///
/// Small sizes use the binomial taps; larger ones a sampled Gaussian whose
/// sigma grows with the size.
pub fn smoothing_kernel(size: usize) -> Vec<f32> {
    match size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![
            0.031_25, 0.109_375, 0.218_75, 0.281_25, 0.218_75, 0.109_375, 0.031_25,
        ],
        _ => gaussian_kernel(size),
    }
}

fn gaussian_kernel(size: usize) -> Vec<f32> {
    let radius = (size / 2) as i64;
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Map a possibly out-of-range index back inside `0..len`, mirroring
/// around the edge sample without repeating it (`c b | a b c | b a`).
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

fn convolve_axis(input: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let radius = (kernel.len() / 2) as isize;
    let len = input.len_of(axis);

    Array2::from_shape_fn(input.dim(), |(row, col)| {
        let center = (if axis == Axis(0) { row } else { col }) as isize;
        kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| {
                let sample = reflect_101(center + k as isize - radius, len);
                let value = if axis == Axis(0) {
                    input[[sample, col]]
                } else {
                    input[[row, sample]]
                };
                weight * value
            })
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::types::{BACKGROUND, FOREGROUND};

    /// Left half background, right half foreground
    fn split_mask(rows: usize, cols: usize) -> Mask {
        Mask::from_shape_fn((rows, cols), |(_, col)| {
            if col < cols / 2 {
                BACKGROUND
            } else {
                FOREGROUND
            }
        })
    }

    #[test]
    fn zero_feather_is_plain_inversion() {
        let mask = split_mask(4, 6);
        let alpha = synthesize_alpha(&mask, None);
        for ((row, col), &a) in alpha.indexed_iter() {
            assert_eq!(a, 255 - mask[[row, col]]);
        }
    }

    #[test]
    fn kernels_are_normalized_and_symmetric() {
        for size in [1, 3, 5, 7, 9, 11, 21] {
            let kernel = smoothing_kernel(size);
            assert_eq!(kernel.len(), size);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "size {} sums to {}", size, sum);
            for i in 0..size {
                assert_eq!(kernel[i], kernel[size - 1 - i]);
            }
        }
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-2, 4), 2);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(2, 4), 2);
        assert_eq!(reflect_101(-7, 2), 1);
        assert_eq!(reflect_101(-3, 1), 0);
    }

    #[test]
    fn uniform_matte_is_unchanged_including_border() {
        for size in [3, 5, 9, 21] {
            let opaque = Mask::from_elem((4, 4), FOREGROUND);
            assert!(synthesize_alpha(&opaque, Some(size)).iter().all(|&a| a == 255));

            let clear = Mask::from_elem((4, 4), BACKGROUND);
            assert!(synthesize_alpha(&clear, Some(size)).iter().all(|&a| a == 0));
        }
    }

    #[test]
    fn edge_band_gets_intermediate_values_and_interior_stays_exact() {
        let mask = split_mask(3, 20);
        let alpha = synthesize_alpha(&mask, Some(5));

        for row in 0..3 {
            // Kernel radius is 2, the edge sits between columns 9 and 10
            for col in 0..8 {
                assert_eq!(alpha[[row, col]], 0);
            }
            for col in 12..20 {
                assert_eq!(alpha[[row, col]], 255);
            }
            assert!(alpha[[row, 9]] > 0 && alpha[[row, 9]] < 255);
            assert!(alpha[[row, 10]] > 0 && alpha[[row, 10]] < 255);
            assert!(alpha[[row, 9]] < alpha[[row, 10]]);
        }
    }

    #[test]
    fn blur_is_separable_in_both_directions() {
        let mask = Mask::from_shape_fn((20, 3), |(row, _)| if row < 10 { BACKGROUND } else { FOREGROUND });
        let alpha = synthesize_alpha(&mask, Some(3));
        // [1,2,1]/4 across the edge: 0.25 and 0.75
        assert_eq!(alpha[[9, 1]], 63);
        assert_eq!(alpha[[10, 1]], 191);
        assert_eq!(alpha[[8, 1]], 0);
        assert_eq!(alpha[[11, 1]], 255);
    }
}
