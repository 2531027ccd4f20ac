//! Named, typed attribute descriptors ("features") and their registry.
//!
//! A [`Feature<T>`] declares one attribute that content entries may carry:
//! a unique name plus a parser from raw data to `T`. Declarations go into an
//! explicit [`FeatureRegistry`] handed around by the loading code; there is
//! no process-global registration. Parsed payloads are stored type-erased in
//! an [`AttributeList`]; retrieval through the originating `Feature<T>`
//! handle downcasts safely, since only that feature's parser can have
//! produced the stored value.

mod attributes;
pub mod builtins;

pub use attributes::*;
pub use builtins::*;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::data::{DataError, DataValue};

type ParseFn<T> = Box<dyn Fn(&DataValue<'_>) -> Result<T, DataError>>;

struct FeatureCore<T> {
    name: String,
    parse: ParseFn<T>,
}

/// A typed feature descriptor.
///
/// Cloning shares the descriptor; the clone and the original are the same
/// feature. Identity is the registration-time name.
pub struct Feature<T> {
    core: Arc<FeatureCore<T>>,
}

impl<T> Clone for Feature<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> std::fmt::Debug for Feature<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feature").field("name", &self.core.name).finish()
    }
}

impl<T: 'static> Feature<T> {
    /// Declare a feature with a hand-written parser.
    pub fn new(
        name: impl Into<String>,
        parse: impl Fn(&DataValue<'_>) -> Result<T, DataError> + 'static,
    ) -> Self {
        Self {
            core: Arc::new(FeatureCore {
                name: name.into(),
                parse: Box::new(parse),
            }),
        }
    }

    /// The feature's unique name.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Parse and validate raw data into a payload.
    ///
    /// Pure: no side effects, no owner required. Loading code uses this both
    /// to build attribute lists and to probe-validate data blocks before any
    /// live association exists.
    pub fn create(&self, value: &DataValue<'_>) -> Result<T, DataError> {
        (self.core.parse)(value)
    }
}

impl<T: DeserializeOwned + 'static> Feature<T> {
    /// Declare a feature whose payload parses through serde.
    pub fn deserialized(name: impl Into<String>) -> Self {
        Self::new(name, |value| value.deserialize())
    }
}

/// Type-erased face of a feature, used by generic loading code.
pub trait ErasedFeature {
    /// The feature's unique name.
    fn name(&self) -> &str;

    /// Parse raw data into an erased payload box.
    fn create_erased(&self, value: &DataValue<'_>) -> Result<Box<dyn Any>, DataError>;
}

impl<T: 'static> ErasedFeature for FeatureCore<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_erased(&self, value: &DataValue<'_>) -> Result<Box<dyn Any>, DataError> {
        Ok(Box::new((self.parse)(value)?))
    }
}

/// Errors from feature declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Two features may never share a name; this is fatal at startup.
    #[error("feature `{0}` is already registered")]
    Duplicate(String),
}

/// The feature namespace: name to erased descriptor.
///
/// Expected to be fully populated before any content file is parsed.
/// Additive only: features have no removal API.
#[derive(Default)]
pub struct FeatureRegistry {
    by_name: HashMap<String, Arc<dyn ErasedFeature>>,
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.by_name.keys().collect();
        names.sort();
        f.debug_struct("FeatureRegistry").field("features", &names).finish()
    }
}

impl FeatureRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a feature, returning the same handle for further use.
    ///
    /// A duplicate name is a configuration error and must abort startup.
    pub fn declare<T: 'static>(&mut self, feature: Feature<T>) -> Result<Feature<T>, FeatureError> {
        let name = feature.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(FeatureError::Duplicate(name));
        }
        self.by_name.insert(name, feature.core.clone());
        Ok(feature)
    }

    /// Look up the erased descriptor for a name.
    pub fn get(&self, name: &str) -> Option<&dyn ErasedFeature> {
        self.by_name.get(name).map(|f| f.as_ref())
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
