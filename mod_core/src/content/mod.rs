//! Content entry types and the host-object lookup boundary.

mod character;
mod scene;
mod timeline;

pub use character::*;
pub use scene::*;
pub use timeline::*;

use game_host::ActorHandle;

use crate::features::Feature;
use crate::registry::ContentRegistry;

/// Resolves the character definition behind a live host object.
///
/// The host owns the association (which definition an actor was spawned
/// from); the extension layer only consumes it.
pub trait CharacterLookup {
    /// The definition for `actor`, if the actor is live and its definition
    /// is registered.
    fn character_of(&self, actor: ActorHandle) -> Option<&CharacterDef>;
}

/// The standard lookup: a live actor arena plus the character registry.
#[derive(Debug, Clone, Copy)]
pub struct SessionCharacters<'a> {
    pub actors: &'a game_host::ActorArena,
    pub characters: &'a ContentRegistry<CharacterDef>,
}

impl CharacterLookup for SessionCharacters<'_> {
    fn character_of(&self, actor: ActorHandle) -> Option<&CharacterDef> {
        let actor = self.actors.get(actor)?;
        self.characters.by_name(&actor.character)
    }
}

impl<T: 'static> Feature<T> {
    /// Query this feature on the character definition behind a live actor.
    ///
    /// Lets a feature declared independently of any content entry be read
    /// straight off host objects.
    pub fn for_actor<'a, L: CharacterLookup>(
        &self,
        lookup: &'a L,
        actor: ActorHandle,
    ) -> Option<&'a T> {
        lookup.character_of(actor)?.attributes().get(self)
    }
}
