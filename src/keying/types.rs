use crate::error::{ChromaKeyError, Result};
use ndarray::Array2;

/// Binary background mask, indexed `[row, col]`.
/// 255 = classified as background, 0 = everything else.
pub type Mask = Array2<u8>;

/// Final opacity per pixel, indexed `[row, col]`.
/// 0 = fully transparent, 255 = fully opaque.
pub type AlphaMatte = Array2<u8>;

pub const BACKGROUND: u8 = 255;
pub const FOREGROUND: u8 = 0;

/// One corner of the hue/saturation/value box that counts as "green".
///
/// Hue uses the half-degree scale (0..180), saturation and value 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvBound {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvBound {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

impl std::str::FromStr for HsvBound {
    type Err = ChromaKeyError;

    /// Parse `"h,s,v"`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [h, sat, v] = parts.as_slice() else {
            return Err(ChromaKeyError::invalid_parameter(format!(
                "expected H,S,V but got '{}'",
                s
            )));
        };

        let component = |name: &str, raw: &str| -> Result<u8> {
            raw.parse::<u8>().map_err(|_| {
                ChromaKeyError::invalid_parameter(format!(
                    "{} component '{}' must be an integer in 0..=255",
                    name, raw
                ))
            })
        };

        Ok(Self::new(
            component("hue", *h)?,
            component("saturation", *sat)?,
            component("value", *v)?,
        ))
    }
}

/// Parameter set for one keying run.
///
/// Built once, then passed by value into [`crate::process`]. The `with_*`
/// setters consume and return a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyParams {
    /// Fraction of the measured excess green removed, 0.0..=1.0
    pub despill_strength: f64,
    /// Blur kernel size for the alpha edge; even values are bumped to the next odd one, 0 disables
    pub feather: u32,
    pub erode_iterations: u32,
    pub dilate_iterations: u32,
    pub lower: HsvBound,
    pub upper: HsvBound,
}

impl KeyParams {
    pub const FEATHER_MAX: u32 = 20;
    pub const ERODE_MAX: u32 = 5;
    pub const DILATE_MAX: u32 = 5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_despill_strength(self, despill_strength: f64) -> Self {
        Self {
            despill_strength,
            ..self
        }
    }

    pub fn with_feather(self, feather: u32) -> Self {
        Self { feather, ..self }
    }

    pub fn with_erode_iterations(self, erode_iterations: u32) -> Self {
        Self {
            erode_iterations,
            ..self
        }
    }

    pub fn with_dilate_iterations(self, dilate_iterations: u32) -> Self {
        Self {
            dilate_iterations,
            ..self
        }
    }

    pub fn with_bounds(self, lower: HsvBound, upper: HsvBound) -> Self {
        Self {
            lower,
            upper,
            ..self
        }
    }

    /// Kernel size actually used for feathering, or `None` when disabled
    pub fn feather_kernel(&self) -> Option<usize> {
        match self.feather {
            0 => None,
            k if k % 2 == 0 => Some(k as usize + 1),
            k => Some(k as usize),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.despill_strength.is_finite() || !(0.0..=1.0).contains(&self.despill_strength) {
            return Err(ChromaKeyError::invalid_parameter(format!(
                "despill strength must be within 0.0..=1.0, got {}",
                self.despill_strength
            )));
        }
        Ok(())
    }
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            despill_strength: 0.7,
            feather: 5,
            erode_iterations: 0,
            dilate_iterations: 1,
            lower: HsvBound::new(35, 100, 100),
            upper: HsvBound::new(85, 255, 255),
        }
    }
}
