mod classify;
mod composite;
mod despill;
mod feather;
mod morphology;
pub mod types;

pub use classify::{classify, in_range, rgb_to_hsv};
pub use composite::{composite, extract_alpha};
pub use despill::{despill, despill_green, green_excess, SPILL_THRESHOLD};
pub use feather::{smoothing_kernel, synthesize_alpha};
pub use morphology::{dilate, erode, refine};
pub use types::{AlphaMatte, HsvBound, KeyParams, Mask};

use crate::error::{ChromaKeyError, Result};
use image::{RgbImage, RgbaImage};

/// Output of one keying run together with the matte that produced it
#[derive(Debug, Clone)]
pub struct KeyedImage {
    pub image: RgbaImage,
    pub matte: AlphaMatte,
}

/// Key out the green background of `image`.
///
/// Runs classify -> refine -> feather -> despill -> composite. Each call
/// owns all of its buffers, so independent images can be keyed in parallel.
pub fn process(image: &RgbImage, params: KeyParams) -> Result<RgbaImage> {
    process_with_matte(image, params).map(|keyed| keyed.image)
}

/// Like [`process`], but also hands back the synthesized alpha matte
pub fn process_with_matte(image: &RgbImage, params: KeyParams) -> Result<KeyedImage> {
    let _span = tracing::debug_span!("process").entered();
    params.validate()?;

    let (width, height) = image.dimensions();
    tracing::debug!("Keying {}x{} image with {:?}", width, height, params);

    let mask = classify(image, params.lower, params.upper);
    let mask = refine(mask, params.erode_iterations, params.dilate_iterations);
    ensure_grid_matches("refine", &mask, width, height)?;

    let matte = synthesize_alpha(&mask, params.feather_kernel());
    ensure_grid_matches("feather", &matte, width, height)?;

    let color = despill(image, params.despill_strength);
    let image = composite(&color, &matte)?;

    Ok(KeyedImage { image, matte })
}

fn ensure_grid_matches(stage: &str, grid: &Mask, width: u32, height: u32) -> Result<()> {
    let (rows, cols) = grid.dim();
    if (rows, cols) != (height as usize, width as usize) {
        return Err(ChromaKeyError::dimension_mismatch(
            stage,
            (width, height),
            (cols as u32, rows as u32),
        ));
    }
    Ok(())
}
