//! Reproducible description of a headless render.
//!
//! A [`Seed`] captures everything needed to re-run a render:
//! surface dimensions, field-state parameters, intervention tag, PRNG seed,
//! and frame count.

use crate::error::EngineError;
use crate::params::json_type_name;
use crate::state::{FieldState, Intervention};
use serde::{Deserialize, Serialize};

/// Reproducible description of a headless render.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// frames. `params` uses the host's camelCase field-state keys and is read
/// leniently; `intervention` is a wire tag such as `"VOID_ANALYSIS"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: u32,
    pub height: u32,
    #[serde(default = "empty_object")]
    pub params: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a new Seed with default params (`{}`), no intervention and
    /// zero frames.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            params: empty_object(),
            intervention: None,
            seed,
            frames: 0,
        }
    }

    /// Parses a seed from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::InvalidSeed(e.to_string()))
    }

    /// Validates that the seed has non-zero dimensions, that
    /// `width * height` does not overflow, and that `params` is an object.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        if !self.params.is_object() {
            return Err(EngineError::ParamTypeMismatch {
                name: "params".into(),
                expected: "object".into(),
                got: json_type_name(&self.params).into(),
            });
        }
        Ok(())
    }

    /// The field state described by `params`, defaults filling the gaps.
    pub fn state(&self) -> FieldState {
        FieldState::from_json(&self.params)
    }

    /// The intervention tag, if present and recognized.
    pub fn intervention(&self) -> Option<Intervention> {
        self.intervention.as_deref().and_then(Intervention::from_tag)
    }
}
