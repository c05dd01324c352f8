mod png;

pub use png::{PngBytesOutput, PngFileOutput};

use crate::error::Result;
use crate::keying::AlphaMatte;
use image::{Rgba, RgbaImage};

/// Trait for output destinations.
///
/// Sinks must keep the alpha channel lossless.
pub trait OutputSink {
    /// Encode and write one keyed image
    fn write_image(&mut self, image: &RgbaImage) -> Result<()>;
}

/// Render an alpha matte as an opaque grayscale image for inspection
pub fn matte_to_rgba(matte: &AlphaMatte) -> RgbaImage {
    let (rows, cols) = matte.dim();
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = matte[[y as usize, x as usize]];
        Rgba([value, value, value, 255])
    })
}
