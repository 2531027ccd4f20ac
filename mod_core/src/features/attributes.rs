//! Per-entry attribute storage.

use std::any::Any;
use std::collections::HashMap;

use crate::data::{DataError, DataObject};

use super::{Feature, FeatureRegistry};

/// The attributes attached to one content entry: feature name to parsed
/// payload.
///
/// Absence of a key means "not attached" - it is never conflated with
/// "attached with a default value". Any defaulting happens inside the
/// feature's own parser.
#[derive(Default)]
pub struct AttributeList {
    values: HashMap<String, Box<dyn Any>>,
}

impl std::fmt::Debug for AttributeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("AttributeList").field("attached", &names).finish()
    }
}

impl AttributeList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach every key/value pair of a data object.
    ///
    /// Each key is resolved through the feature registry; an unknown key
    /// aborts immediately with an error naming the key and its path.
    /// Attributes already added by this call are not rolled back - the
    /// enclosing registry add provides atomicity through its id-claim
    /// rollback.
    pub fn add_many(
        &mut self,
        features: &FeatureRegistry,
        data: &DataObject<'_>,
    ) -> Result<(), DataError> {
        for (key, value) in data.entries() {
            let feature = features.get(key).ok_or_else(|| {
                DataError::new(value.path().clone(), format!("unknown feature `{key}`"))
            })?;
            let payload = feature.create_erased(&value)?;
            self.values.insert(feature.name().to_string(), payload);
        }
        Ok(())
    }

    /// Typed lookup through the originating feature handle.
    ///
    /// Returns `None` when the feature is not attached.
    pub fn get<T: 'static>(&self, feature: &Feature<T>) -> Option<&T> {
        self.values
            .get(feature.name())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Attach or replace a value programmatically.
    pub fn set<T: 'static>(&mut self, feature: &Feature<T>, value: T) {
        self.values.insert(feature.name().to_string(), Box::new(value));
    }

    /// Detach a feature, reporting whether it was attached.
    pub fn remove<T: 'static>(&mut self, feature: &Feature<T>) -> bool {
        self.values.remove(feature.name()).is_some()
    }

    /// Check whether a feature is attached.
    pub fn contains<T: 'static>(&self, feature: &Feature<T>) -> bool {
        self.values.contains_key(feature.name())
    }

    /// Check attachment by feature name. Used by gating code that holds no
    /// typed handle.
    pub fn contains_named(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of attached features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no features are attached.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
