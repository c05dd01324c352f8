use super::ImageSource;
use crate::error::{ChromaKeyError, Result};
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ImageSource for FileSource {
    fn load(&self) -> Result<RgbImage> {
        let _span = tracing::debug_span!("decode_file").entered();

        // Sniff the format from content so a mislabelled extension still decodes
        let decoded = ImageReader::open(&self.path)
            .map_err(|e| ChromaKeyError::input_not_found(self.name(), e))?
            .with_guessed_format()
            .map_err(|e| ChromaKeyError::input_not_found(self.name(), e))?
            .decode()
            .map_err(|e| ChromaKeyError::input_not_found(self.name(), e))?;

        tracing::debug!(
            "Decoded {} ({}x{})",
            self.path.display(),
            decoded.width(),
            decoded.height()
        );

        Ok(decoded.to_rgb8())
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}
