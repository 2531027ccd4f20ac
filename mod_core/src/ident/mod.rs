//! Extensible identifiers: string-backed tokens claimed by content entries.
//!
//! An [`Ident`] starts life transient (parsed from incoming text, slot `-1`).
//! Claiming it through an [`IdentPool`] assigns a slot and guarantees that
//! every later lookup of the same name hands out a clone of the same
//! allocation, so comparisons between claimed identifiers are by identity.
//! Releasing a claim frees the slot for reuse and the name for a later
//! registration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Slot value of an identifier that has never been claimed.
pub const UNCLAIMED_SLOT: i32 = -1;

#[derive(Debug)]
struct IdentInner {
    name: String,
    slot: AtomicI32,
}

/// A string-backed identifier token.
///
/// Cloning is cheap (shared allocation). Equality is pointer identity when
/// both sides come from the same claim, falling back to name equality so a
/// transient parsed identifier still matches its claimed counterpart.
#[derive(Debug, Clone)]
pub struct Ident {
    inner: Arc<IdentInner>,
}

impl Ident {
    /// Create a transient identifier from incoming text. Not yet claimed.
    pub fn parsed(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(IdentInner {
                name: name.into(),
                slot: AtomicI32::new(UNCLAIMED_SLOT),
            }),
        }
    }

    /// The wrapped name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The slot assigned at claim time, or [`UNCLAIMED_SLOT`].
    pub fn slot(&self) -> i32 {
        self.inner.slot.load(Ordering::Relaxed)
    }

    /// Check whether this identifier currently backs a claim.
    pub fn is_claimed(&self) -> bool {
        self.slot() != UNCLAIMED_SLOT
    }

    /// Check whether two identifiers share one allocation.
    pub fn same(&self, other: &Ident) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || self.inner.name == other.inner.name
    }
}

impl Eq for Ident {}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Ident::parsed(name))
    }
}

/// Errors from claiming and releasing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentError {
    /// The name is already claimed; a collision is a configuration error.
    #[error("identifier `{0}` is already claimed")]
    AlreadyClaimed(String),

    /// The name has no active claim to release.
    #[error("identifier `{0}` is not claimed")]
    NotClaimed(String),
}

/// The claim table for one identifier namespace.
///
/// At most one claim per name; released slots go on a free list and are
/// handed to later claims.
#[derive(Debug, Default)]
pub struct IdentPool {
    claimed: HashMap<String, Ident>,
    slots: Vec<Option<Ident>>,
    free: Vec<usize>,
}

impl IdentPool {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name`, assigning a slot.
    ///
    /// Fails if the name is already claimed. The returned identifier is the
    /// canonical allocation for the name until it is released.
    pub fn claim(&mut self, name: &str) -> Result<Ident, IdentError> {
        if self.claimed.contains_key(name) {
            return Err(IdentError::AlreadyClaimed(name.to_string()));
        }
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let ident = Ident::parsed(name);
        ident.inner.slot.store(slot as i32, Ordering::Relaxed);
        self.slots[slot] = Some(ident.clone());
        self.claimed.insert(name.to_string(), ident.clone());
        Ok(ident)
    }

    /// Release the claim on `ident`'s name.
    ///
    /// The identifier reverts to the unclaimed sentinel and its slot and
    /// name become available for reuse.
    pub fn release(&mut self, ident: &Ident) -> Result<(), IdentError> {
        let claimed = self
            .claimed
            .remove(ident.name())
            .ok_or_else(|| IdentError::NotClaimed(ident.name().to_string()))?;
        let slot = claimed.slot();
        claimed.inner.slot.store(UNCLAIMED_SLOT, Ordering::Relaxed);
        if slot >= 0 {
            let slot = slot as usize;
            self.slots[slot] = None;
            self.free.push(slot);
        }
        Ok(())
    }

    /// The claimed identifier for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Ident> {
        self.claimed.get(name).cloned()
    }

    /// The claimed identifier occupying `slot`, if any.
    pub fn by_slot(&self, slot: u32) -> Option<Ident> {
        self.slots.get(slot as usize).and_then(|s| s.clone())
    }

    /// Check whether `name` is currently claimed.
    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }

    /// Number of active claims.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check whether the pool has no active claims.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Iterate over all claimed identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &Ident> {
        self.claimed.values()
    }
}
