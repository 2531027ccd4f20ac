//! Per-actor auxiliary state, gated by feature presence.
//!
//! Extensions attach working state to live actors without touching the host
//! object model: a side table keyed by [`ActorHandle`]. Because handles are
//! generational, a despawned actor's entry can never be observed again;
//! [`OwnerCache::sweep`] reclaims the storage.
//!
//! Known limitation, preserved deliberately: once constructed, a live
//! holder's value is never rebuilt, even if a content reload changes the
//! data it was derived from.

use std::collections::HashMap;

use game_host::{ActorArena, ActorHandle};

use crate::features::{AttributeList, Feature};

/// Lazily-constructed per-actor state.
///
/// When a required feature is configured, actors whose character definition
/// lacks that feature get no state: lookups report absence and allocate
/// nothing.
#[derive(Debug)]
pub struct OwnerCache<T> {
    required: Option<String>,
    entries: HashMap<ActorHandle, T>,
}

impl<T> Default for OwnerCache<T> {
    fn default() -> Self {
        Self {
            required: None,
            entries: HashMap::new(),
        }
    }
}

impl<T: Default> OwnerCache<T> {
    /// Create an ungated cache: every live actor may hold state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache restricted to actors whose definition carries
    /// `feature`.
    pub fn gated<U: 'static>(feature: &Feature<U>) -> Self {
        Self {
            required: Some(feature.name().to_string()),
            entries: HashMap::new(),
        }
    }

    /// The state for `holder`, constructing a default value on first access.
    ///
    /// Returns `None` without allocating when the gate fails (`attributes`
    /// is absent or lacks the required feature) or when `holder` is no
    /// longer live in `arena`.
    pub fn get(
        &mut self,
        attributes: Option<&AttributeList>,
        holder: ActorHandle,
        arena: &ActorArena,
    ) -> Option<&mut T> {
        if let Some(required) = &self.required {
            match attributes {
                Some(list) if list.contains_named(required) => {}
                _ => return None,
            }
        }
        if !arena.is_live(holder) {
            return None;
        }
        Some(self.entries.entry(holder).or_default())
    }

    /// The state for `holder`, if one was already constructed.
    pub fn try_get(&self, holder: ActorHandle) -> Option<&T> {
        self.entries.get(&holder)
    }

    /// Drop entries whose holders are no longer live.
    pub fn sweep(&mut self, arena: &ActorArena) {
        self.entries.retain(|holder, _| arena.is_live(*holder));
    }

    /// Number of constructed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no entries have been constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRegistry;
    use game_host::Actor;

    #[derive(Debug, Default, PartialEq)]
    struct TrackedSteps {
        steps: u32,
    }

    fn hibernation_feature() -> Feature<bool> {
        let mut features = FeatureRegistry::new();
        features
            .declare(Feature::<bool>::deserialized("hibernates"))
            .unwrap()
    }

    #[test]
    fn test_lazy_default_construction() {
        let mut arena = ActorArena::new();
        let fox = arena.spawn(Actor::new("Snow", "fox"));

        let mut cache: OwnerCache<TrackedSteps> = OwnerCache::new();
        assert!(cache.try_get(fox).is_none());

        cache.get(None, fox, &arena).unwrap().steps = 7;
        assert_eq!(cache.try_get(fox).unwrap().steps, 7);

        // Second access returns the same value, not a fresh default.
        assert_eq!(cache.get(None, fox, &arena).unwrap().steps, 7);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_feature_gate_blocks_allocation() {
        let hibernates = hibernation_feature();
        let mut arena = ActorArena::new();
        let fox = arena.spawn(Actor::new("Snow", "fox"));

        let mut cache: OwnerCache<TrackedSteps> = OwnerCache::gated(&hibernates);

        // No attribute list at all, and a list without the feature: absent
        // on every call, never allocating.
        let bare = AttributeList::new();
        assert!(cache.get(None, fox, &arena).is_none());
        assert!(cache.get(Some(&bare), fox, &arena).is_none());
        assert!(cache.get(Some(&bare), fox, &arena).is_none());
        assert!(cache.is_empty());

        let mut carrying = AttributeList::new();
        carrying.set(&hibernates, true);
        assert!(cache.get(Some(&carrying), fox, &arena).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_dead_holder_is_absent() {
        let mut arena = ActorArena::new();
        let fox = arena.spawn(Actor::new("Snow", "fox"));

        let mut cache: OwnerCache<TrackedSteps> = OwnerCache::new();
        cache.get(None, fox, &arena).unwrap().steps = 3;

        arena.despawn(fox);
        assert!(cache.get(None, fox, &arena).is_none());
    }

    #[test]
    fn test_sweep_reclaims_dead_entries() {
        let mut arena = ActorArena::new();
        let fox = arena.spawn(Actor::new("Snow", "fox"));
        let wolf = arena.spawn(Actor::new("Ash", "wolf"));

        let mut cache: OwnerCache<TrackedSteps> = OwnerCache::new();
        cache.get(None, fox, &arena);
        cache.get(None, wolf, &arena);
        assert_eq!(cache.len(), 2);

        arena.despawn(fox);
        cache.sweep(&arena);
        assert_eq!(cache.len(), 1);
        assert!(cache.try_get(wolf).is_some());
    }

    #[test]
    fn test_value_survives_between_accesses() {
        // The staleness limitation: the cache never rebuilds a live
        // holder's value, whatever happens to the content it came from.
        let mut arena = ActorArena::new();
        let fox = arena.spawn(Actor::new("Snow", "fox"));

        let mut cache: OwnerCache<TrackedSteps> = OwnerCache::new();
        cache.get(None, fox, &arena).unwrap().steps = 42;

        // A reload elsewhere does not touch constructed values.
        assert_eq!(cache.get(None, fox, &arena).unwrap().steps, 42);
    }
}
