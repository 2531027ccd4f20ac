//! Generational arena owning the lifetime of every live actor.
//!
//! Handles carry a slot index plus a generation counter. Despawning a slot
//! bumps its generation, so handles held elsewhere (caches, side tables)
//! stop resolving the moment the actor is gone.

use serde::{Deserialize, Serialize};

use super::Actor;

/// Handle to an actor slot. Cheap to copy, safe to hold across despawns:
/// a stale handle simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorHandle {
    index: u32,
    generation: u32,
}

impl ActorHandle {
    /// Slot index inside the arena.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

/// Arena of live actors.
///
/// Slots are reused after despawn with a bumped generation. The arena is the
/// single owner of actor lifetimes; everything else refers to actors through
/// [`ActorHandle`] values.
#[derive(Debug, Default)]
pub struct ActorArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ActorArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an actor, returning its handle.
    pub fn spawn(&mut self, actor: Actor) -> ActorHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.actor = Some(actor);
        ActorHandle {
            index,
            generation: slot.generation,
        }
    }

    /// Despawn the actor behind `handle`, returning it if the handle was live.
    ///
    /// The slot's generation is bumped so outstanding handles go stale.
    pub fn despawn(&mut self, handle: ActorHandle) -> Option<Actor> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let actor = slot.actor.take()?;
        slot.generation += 1;
        self.free.push(handle.index);
        Some(actor)
    }

    /// Get the actor behind a handle, if it is still live.
    pub fn get(&self, handle: ActorHandle) -> Option<&Actor> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.actor.as_ref()
    }

    /// Get the actor behind a handle mutably, if it is still live.
    pub fn get_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.actor.as_mut()
    }

    /// Check whether a handle still refers to a live actor.
    pub fn is_live(&self, handle: ActorHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.actor.is_some()).count()
    }

    /// Check whether the arena holds no live actors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live actors with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ActorHandle, &Actor)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.actor.as_ref().map(|actor| {
                (
                    ActorHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    actor,
                )
            })
        })
    }
}
