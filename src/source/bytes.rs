use super::ImageSource;
use crate::error::{ChromaKeyError, Result};
use image::RgbImage;

/// Encoded image held in memory, e.g. a download or an upload
pub struct BytesSource {
    label: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new<S: Into<String>>(label: S, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

impl ImageSource for BytesSource {
    fn load(&self) -> Result<RgbImage> {
        let _span = tracing::debug_span!("decode_bytes").entered();

        let decoded = image::load_from_memory(&self.bytes)
            .map_err(|e| ChromaKeyError::input_not_found(self.name(), e))?;

        Ok(decoded.to_rgb8())
    }

    fn name(&self) -> String {
        self.label.clone()
    }
}
