//! Timeline graph resolution: ancestor flattening and the composed order.
//!
//! Two independent algorithms over the registered timelines. Ancestor
//! flattening turns each timeline's `base` declarations into a search
//! priority chain for override lookup. The composed order splices every
//! anchored timeline into the host's built-in order via a topological sort
//! of the declared constraints. Results are cached here and dropped by
//! [`TimelineResolver::invalidate`] when the host signals a reload.

mod overrides;

pub use overrides::*;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::content::Timeline;
use crate::ident::Ident;
use crate::registry::{ContentRegistry, ContentSource};

/// Errors from composed-order resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// The declared ordering constraints are not a DAG. Always a
    /// configuration error: the edges involved are user-declared, between
    /// custom timelines only.
    #[error("ordering constraints among timelines form a cycle: {names:?}")]
    OrderingCycle { names: Vec<String> },
}

/// The ancestor search chain for one timeline: `[self, ...flattened base
/// ancestry...]`, deduplicated.
///
/// Depth-first over `base` declarations in declared order. A base that is
/// itself a registered timeline is expanded recursively; anything else is
/// appended as a terminal ancestor. An identifier already in the chain is
/// never re-expanded, which makes diamond inheritance and accidental cycles
/// terminate instead of recursing forever.
pub fn flatten_priorities(registry: &ContentRegistry<Timeline>, key: &Ident) -> Vec<Ident> {
    let mut chain = Vec::new();
    flatten_into(registry, key, &mut chain);
    chain
}

fn flatten_into(registry: &ContentRegistry<Timeline>, key: &Ident, chain: &mut Vec<Ident>) {
    if chain.contains(key) {
        return;
    }
    match registry.idents().get(key.name()) {
        Some(claimed) => {
            chain.push(claimed.clone());
            if let Some(timeline) = registry.get(&claimed) {
                for base in timeline.bases() {
                    flatten_into(registry, base, chain);
                }
            }
        }
        // Terminal ancestor: named but not a registered timeline.
        None => chain.push(key.clone()),
    }
}

/// Resolver over the timeline registry, caching both algorithms' results
/// between reloads.
#[derive(Debug, Default)]
pub struct TimelineResolver {
    base_order: Vec<Ident>,
    composed: Option<Vec<Ident>>,
    chains: HashMap<String, Vec<Ident>>,
}

impl TimelineResolver {
    /// Create a resolver around the host's built-in timeline order.
    pub fn new(base_order: Vec<Ident>) -> Self {
        Self {
            base_order,
            composed: None,
            chains: HashMap::new(),
        }
    }

    /// The externally-supplied built-in order.
    pub fn base_order(&self) -> &[Ident] {
        &self.base_order
    }

    /// The ancestor search chain for `key`, memoized until the next
    /// [`invalidate`](Self::invalidate).
    pub fn priorities(&mut self, registry: &ContentRegistry<Timeline>, key: &Ident) -> &[Ident] {
        self.chains
            .entry(key.name().to_string())
            .or_insert_with(|| flatten_priorities(registry, key))
    }

    /// The composed global order: built-in order plus every anchored custom
    /// timeline, memoized until the next [`invalidate`](Self::invalidate).
    ///
    /// A timeline with no anchor present anywhere in the order is left out
    /// without an error; it remains registered and independently usable.
    pub fn composed_order(
        &mut self,
        registry: &ContentRegistry<Timeline>,
    ) -> Result<&[Ident], TimelineError> {
        if self.composed.is_none() {
            self.composed = Some(compose(&self.base_order, registry)?);
        }
        Ok(self.composed.as_deref().unwrap_or_default())
    }

    /// Drop every cached result. Called on the host's reload signal;
    /// consumers must not assume cached orders survive a reload.
    pub fn invalidate(&mut self) {
        self.composed = None;
        self.chains.clear();
    }
}

fn compose(
    base_order: &[Ident],
    registry: &ContentRegistry<Timeline>,
) -> Result<Vec<Ident>, TimelineError> {
    // Only timelines that asked for a place take part; sort by name for
    // stable output.
    let mut remaining: Vec<&Timeline> = registry
        .iter()
        .filter(|timeline| timeline.has_order_constraint())
        .collect();
    remaining.sort_by(|a, b| a.key().name().cmp(b.key().name()));

    let subset: HashSet<&str> = remaining.iter().map(|t| t.key().name()).collect();

    // Topological sort over constraints that point at other custom entries.
    // Anchors must be spliced before anything that anchors on them.
    let mut ordered: Vec<&Timeline> = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();
    while !remaining.is_empty() {
        let next = remaining
            .iter()
            .position(|t| deps_in_subset(t, &subset).all(|name| placed.contains(name)));
        match next {
            Some(index) => {
                let timeline = remaining.remove(index);
                placed.insert(timeline.key().name());
                ordered.push(timeline);
            }
            None => {
                return Err(TimelineError::OrderingCycle {
                    names: remaining
                        .iter()
                        .map(|t| t.key().name().to_string())
                        .collect(),
                })
            }
        }
    }

    let mut composed = base_order.to_vec();
    for timeline in ordered {
        let key = timeline.key().clone();
        let before = timeline
            .insert_before()
            .iter()
            .find_map(|anchor| composed.iter().position(|present| present == anchor));
        if let Some(position) = before {
            composed.insert(position, key);
            continue;
        }
        let after = timeline
            .insert_after()
            .iter()
            .find_map(|anchor| composed.iter().position(|present| present == anchor));
        match after {
            Some(position) => composed.insert(position + 1, key),
            None => {
                tracing::debug!(timeline = %key, "no anchor present, timeline left out of composed order");
            }
        }
    }
    Ok(composed)
}

fn deps_in_subset<'a>(
    timeline: &'a Timeline,
    subset: &'a HashSet<&'a str>,
) -> impl Iterator<Item = &'a str> {
    timeline
        .insert_before()
        .iter()
        .chain(timeline.insert_after())
        .map(|ident| ident.name())
        .filter(move |name| subset.contains(name))
}
