//! Character definitions.

use crate::data::DataObject;
use crate::features::AttributeList;
use crate::ident::Ident;
use crate::registry::{ContentError, ContentSource, LoadContext};

/// An externally-declared playable character.
///
/// Immutable after construction except through the narrow attribute
/// mutation API ([`attributes_mut`](Self::attributes_mut)).
#[derive(Debug)]
pub struct CharacterDef {
    key: Ident,
    name: String,
    attributes: AttributeList,
}

impl CharacterDef {
    /// Create a character programmatically (non-file construction).
    pub fn new(key: Ident, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            attributes: AttributeList::new(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attached features.
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    /// Mutable access for programmatic attribute add/remove.
    pub fn attributes_mut(&mut self) -> &mut AttributeList {
        &mut self.attributes
    }
}

impl ContentSource for CharacterDef {
    fn from_data(
        key: Ident,
        data: &DataObject<'_>,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, ContentError> {
        let name = data.require("name")?.as_str()?.to_string();
        let mut attributes = AttributeList::new();
        if let Some(block) = data.get("features") {
            attributes.add_many(ctx.features, &block.as_object()?)?;
        }
        Ok(Self {
            key,
            name,
            attributes,
        })
    }

    fn key(&self) -> &Ident {
        &self.key
    }
}
