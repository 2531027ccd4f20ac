//! The host's builtin feature catalog.
//!
//! Third-party catalogs follow the same pattern: declare typed handles once
//! against the injected registry, keep the handles, query them anywhere.

use crate::data::DataError;

use super::{Feature, FeatureError, FeatureRegistry};

/// Typed handles to the builtin features.
#[derive(Debug, Clone)]
pub struct BuiltinFeatures {
    /// Whether the character is active at night.
    pub nocturnal: Feature<bool>,
    /// Movement speed multiplier, strictly positive.
    pub movement_scale: Feature<f64>,
    /// Food kinds the character accepts.
    pub diet: Feature<Vec<String>>,
    /// Color names used by the presentation layer.
    pub palette: Feature<Vec<String>>,
}

impl BuiltinFeatures {
    /// Declare every builtin feature into `registry`.
    ///
    /// Runs once at startup, before any content file is parsed.
    pub fn register(registry: &mut FeatureRegistry) -> Result<Self, FeatureError> {
        Ok(Self {
            nocturnal: registry.declare(Feature::deserialized("nocturnal"))?,
            movement_scale: registry.declare(Feature::new("movement_scale", |value| {
                let scale = value.as_f64()?;
                if scale <= 0.0 {
                    return Err(DataError::new(
                        value.path().clone(),
                        "movement_scale must be positive",
                    ));
                }
                Ok(scale)
            }))?,
            diet: registry.declare(Feature::deserialized("diet"))?,
            palette: registry.declare(Feature::deserialized("palette"))?,
        })
    }
}
