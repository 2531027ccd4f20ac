//! Narrative timeline definitions.

use crate::data::DataObject;
use crate::features::AttributeList;
use crate::ident::Ident;
use crate::registry::{ContentError, ContentSource, LoadContext};

/// An externally-declared narrative timeline variant.
///
/// Timelines relate to each other two ways: `bases` names ordered candidate
/// parents for inheritance and override search (first match wins), and
/// `insert_before` / `insert_after` anchor the timeline into the global
/// composed order. A timeline may anchor on one side only; declaring both
/// fails construction.
#[derive(Debug)]
pub struct Timeline {
    key: Ident,
    name: String,
    bases: Vec<Ident>,
    insert_before: Vec<Ident>,
    insert_after: Vec<Ident>,
    attributes: AttributeList,
}

impl Timeline {
    /// Display name (defaults to the id).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered candidate parents.
    pub fn bases(&self) -> &[Ident] {
        &self.bases
    }

    /// Anchors this timeline precedes.
    pub fn insert_before(&self) -> &[Ident] {
        &self.insert_before
    }

    /// Anchors this timeline follows.
    pub fn insert_after(&self) -> &[Ident] {
        &self.insert_after
    }

    /// The attached features.
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    /// Check whether this timeline asked for a place in the composed order.
    pub fn has_order_constraint(&self) -> bool {
        !self.insert_before.is_empty() || !self.insert_after.is_empty()
    }
}

fn ident_list(data: &DataObject<'_>, field: &str) -> Result<Vec<Ident>, ContentError> {
    match data.get(field) {
        Some(value) => Ok(value
            .string_list()?
            .into_iter()
            .map(Ident::parsed)
            .collect()),
        None => Ok(Vec::new()),
    }
}

impl ContentSource for Timeline {
    fn from_data(
        key: Ident,
        data: &DataObject<'_>,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, ContentError> {
        let name = match data.get("name") {
            Some(value) => value.as_str()?.to_string(),
            None => key.name().to_string(),
        };
        let bases = ident_list(data, "base")?;
        let insert_before = ident_list(data, "insert_before")?;
        let insert_after = ident_list(data, "insert_after")?;
        if !insert_before.is_empty() && !insert_after.is_empty() {
            return Err(ContentError::ConflictingAnchors {
                name: key.name().to_string(),
            });
        }
        let mut attributes = AttributeList::new();
        if let Some(block) = data.get("features") {
            attributes.add_many(ctx.features, &block.as_object()?)?;
        }
        Ok(Self {
            key,
            name,
            bases,
            insert_before,
            insert_after,
            attributes,
        })
    }

    fn key(&self) -> &Ident {
        &self.key
    }
}
