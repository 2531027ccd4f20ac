//! Live actor objects managed by the host game.

mod arena;

pub use arena::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a live actor, independent of its arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an actor ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty actor ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live actor in the running session.
///
/// Actors are instantiated from externally-declared character definitions;
/// `character` holds the definition name so the extension layer can resolve
/// the definition back from a live object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// Name of the character definition this actor was instantiated from.
    pub character: String,
}

impl Actor {
    /// Create a new actor instantiated from the named character definition.
    pub fn new(name: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            character: character.into(),
        }
    }
}
