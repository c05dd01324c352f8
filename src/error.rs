//! Error types for chroma-key extraction

use thiserror::Error;

/// Result type alias for chroma-key operations
pub type Result<T> = std::result::Result<T, ChromaKeyError>;

#[derive(Error, Debug)]
pub enum ChromaKeyError {
    /// The source image could not be located or decoded
    #[error("Input not found: {source_name}: {reason}")]
    InputNotFound { source_name: String, reason: String },

    /// A parameter lies outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffers derived from one input disagree on their dimensions
    #[error("Internal consistency fault: {0}")]
    InternalConsistency(String),

    /// The keyed image could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A preset file could not be parsed
    #[error("Preset error: {0}")]
    Preset(String),
}

impl ChromaKeyError {
    pub fn input_not_found<S: Into<String>, R: ToString>(source_name: S, reason: R) -> Self {
        Self::InputNotFound {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a dimension mismatch fault between two buffers
    pub fn dimension_mismatch(stage: &str, expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::InternalConsistency(format!(
            "{}: expected {}x{}, got {}x{}",
            stage, expected.0, expected.1, actual.0, actual.1
        ))
    }
}
