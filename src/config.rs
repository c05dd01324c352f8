//! JSON presets for the keying parameters
//!
//! A preset may set any subset of the parameters; keys it leaves out keep
//! whatever the base parameter set already had:
//!
//! ```json
//! { "despill_strength": 0.5, "feather": 3, "lower": [40, 80, 80] }
//! ```

use crate::error::{ChromaKeyError, Result};
use crate::keying::{HsvBound, KeyParams};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub despill_strength: Option<f64>,
    pub feather: Option<i64>,
    pub erode_iterations: Option<i64>,
    pub dilate_iterations: Option<i64>,
    pub lower: Option<[i64; 3]>,
    pub upper: Option<[i64; 3]>,
}

impl Preset {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ChromaKeyError::Preset(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| match e {
            ChromaKeyError::Preset(msg) => {
                ChromaKeyError::Preset(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Overlay this preset onto `base`, rejecting negative values and counts above the caps
    pub fn apply(&self, base: KeyParams) -> Result<KeyParams> {
        let mut params = base;

        if let Some(strength) = self.despill_strength {
            params = params.with_despill_strength(strength);
        }
        if let Some(feather) = self.feather {
            params = params.with_feather(count("feather", feather, KeyParams::FEATHER_MAX)?);
        }
        if let Some(erode) = self.erode_iterations {
            params = params.with_erode_iterations(count("erode_iterations", erode, KeyParams::ERODE_MAX)?);
        }
        if let Some(dilate) = self.dilate_iterations {
            params = params.with_dilate_iterations(count("dilate_iterations", dilate, KeyParams::DILATE_MAX)?);
        }

        let lower = match self.lower {
            Some(triple) => bound("lower", triple)?,
            None => params.lower,
        };
        let upper = match self.upper {
            Some(triple) => bound("upper", triple)?,
            None => params.upper,
        };
        params = params.with_bounds(lower, upper);

        params.validate()?;
        Ok(params)
    }
}

/// Same caps the command line enforces
fn count(name: &str, value: i64, max: u32) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            ChromaKeyError::invalid_parameter(format!(
                "{} must be an integer in 0..={}, got {}",
                name, max, value
            ))
        })
}

fn bound(name: &str, [h, s, v]: [i64; 3]) -> Result<HsvBound> {
    let component = |value: i64| {
        u8::try_from(value).map_err(|_| {
            ChromaKeyError::invalid_parameter(format!(
                "{} bound components must lie in 0..=255, got [{}, {}, {}]",
                name, h, s, v
            ))
        })
    };
    Ok(HsvBound::new(component(h)?, component(s)?, component(v)?))
}
