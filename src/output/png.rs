use super::OutputSink;
use crate::error::{ChromaKeyError, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn encode_png<W: Write>(writer: W, image: &RgbaImage) -> Result<()> {
    let _span = tracing::debug_span!("encode_png").entered();

    let (width, height) = image.dimensions();
    PngEncoder::new(writer)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| ChromaKeyError::Encode(e.to_string()))
}

/// Writes RGBA PNG files
pub struct PngFileOutput {
    path: PathBuf,
}

impl PngFileOutput {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl OutputSink for PngFileOutput {
    fn write_image(&mut self, image: &RgbaImage) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        encode_png(&mut writer, image)?;
        writer.flush()?;

        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Collects RGBA PNG bytes in memory
#[derive(Default)]
pub struct PngBytesOutput {
    buffer: Vec<u8>,
}

impl PngBytesOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl OutputSink for PngBytesOutput {
    fn write_image(&mut self, image: &RgbaImage) -> Result<()> {
        self.buffer.clear();
        encode_png(&mut self.buffer, image)
    }
}
