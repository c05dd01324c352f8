//! Green-screen keying: turns an image shot against a uniform green backdrop
//! into an RGBA image with a real alpha channel and the green spill removed.

pub mod config;
pub mod error;
pub mod keying;
pub mod output;
pub mod source;

pub use config::Preset;
pub use error::{ChromaKeyError, Result};
pub use keying::{process, process_with_matte, AlphaMatte, HsvBound, KeyParams, KeyedImage, Mask};
pub use output::{matte_to_rgba, OutputSink, PngBytesOutput, PngFileOutput};
pub use source::{BytesSource, FileSource, ImageSource};
