mod bytes;
mod file;

pub use bytes::BytesSource;
pub use file::FileSource;

use crate::error::Result;
use image::RgbImage;

/// Trait for places a green-screen image can be decoded from
pub trait ImageSource {
    /// Decode the image into a 3-channel RGB buffer
    fn load(&self) -> Result<RgbImage>;

    /// Human-readable name used in logs and errors
    fn name(&self) -> String;
}
