//! Visual scene definitions.

use crate::data::DataObject;
use crate::features::AttributeList;
use crate::ident::Ident;
use crate::registry::{ContentError, ContentSource, LoadContext};

/// An externally-declared visual scene.
#[derive(Debug)]
pub struct SceneDef {
    key: Ident,
    title: String,
    /// File stem of the scene illustration; the presentation layer probes
    /// for timeline overrides of this stem.
    illustration: Option<String>,
    /// Characters appearing in the scene, by definition id.
    cast: Vec<Ident>,
    attributes: AttributeList,
}

impl SceneDef {
    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Illustration file stem, if the scene has one.
    pub fn illustration(&self) -> Option<&str> {
        self.illustration.as_deref()
    }

    /// Characters appearing in the scene.
    pub fn cast(&self) -> &[Ident] {
        &self.cast
    }

    /// The attached features.
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }
}

impl ContentSource for SceneDef {
    fn from_data(
        key: Ident,
        data: &DataObject<'_>,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, ContentError> {
        let title = data.require("title")?.as_str()?.to_string();
        let illustration = match data.get("illustration") {
            Some(value) => Some(value.as_str()?.to_string()),
            None => None,
        };
        let cast = match data.get("cast") {
            Some(value) => value
                .string_list()?
                .into_iter()
                .map(Ident::parsed)
                .collect(),
            None => Vec::new(),
        };
        let mut attributes = AttributeList::new();
        if let Some(block) = data.get("features") {
            attributes.add_many(ctx.features, &block.as_object()?)?;
        }
        Ok(Self {
            key,
            title,
            illustration,
            cast,
            attributes,
        })
    }

    fn key(&self) -> &Ident {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use crate::features::FeatureRegistry;

    fn build(text: &str) -> Result<SceneDef, ContentError> {
        let features = FeatureRegistry::new();
        let raw: serde_json::Value = serde_json::from_str(text).unwrap();
        let root = DataValue::root(&raw);
        let data = root.as_object().unwrap();
        SceneDef::from_data(
            Ident::parsed("den_morning"),
            &data,
            &LoadContext {
                features: &features,
            },
        )
    }

    #[test]
    fn test_from_data() {
        let scene = build(
            r#"{
                "id": "den_morning",
                "title": "Morning at the Den",
                "illustration": "den_morning",
                "cast": ["fox", "wolf"]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.title(), "Morning at the Den");
        assert_eq!(scene.illustration(), Some("den_morning"));
        assert_eq!(scene.cast().len(), 2);
        assert_eq!(scene.cast()[0].name(), "fox");
    }

    #[test]
    fn test_title_is_required() {
        let err = build(r#"{"id": "den_morning"}"#).unwrap_err();
        assert!(matches!(err, ContentError::Data(_)));
    }

    #[test]
    fn test_optional_fields_default() {
        let scene = build(r#"{"id": "den_morning", "title": "Morning"}"#).unwrap();
        assert!(scene.illustration().is_none());
        assert!(scene.cast().is_empty());
        assert!(scene.attributes().is_empty());
    }

    #[test]
    fn test_cast_must_be_strings() {
        let err = build(r#"{"id": "den_morning", "title": "Morning", "cast": [1]}"#).unwrap_err();
        let path = err.data_path().unwrap().to_string();
        assert_eq!(path, ".cast[0]");
    }
}
