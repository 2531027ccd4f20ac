//! Extension layer configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ident::Ident;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where content lives and how the composed order starts out.
///
/// Every field has a default, so an empty TOML file is a valid
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Root directory all content directories live under.
    pub content_root: PathBuf,
    /// Character definition files, relative to the root.
    pub characters_dir: String,
    /// Scene definition files, relative to the root.
    pub scenes_dir: String,
    /// Timeline definition files, relative to the root.
    pub timelines_dir: String,
    /// Suffix probed during illustration override lookup.
    pub override_suffix: String,
    /// The host's built-in timeline order, anchors for custom timelines.
    pub base_timelines: Vec<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("mods"),
            characters_dir: "characters".to_string(),
            scenes_dir: "scenes".to_string(),
            timelines_dir: "timelines".to_string(),
            override_suffix: ".png".to_string(),
            base_timelines: vec!["standard".to_string()],
        }
    }
}

impl ExtensionConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Directory of character definition files.
    pub fn characters_path(&self) -> PathBuf {
        self.content_root.join(&self.characters_dir)
    }

    /// Directory of scene definition files.
    pub fn scenes_path(&self) -> PathBuf {
        self.content_root.join(&self.scenes_dir)
    }

    /// Directory of timeline definition files.
    pub fn timelines_path(&self) -> PathBuf {
        self.content_root.join(&self.timelines_dir)
    }

    /// The built-in timeline order as identifiers.
    pub fn base_order(&self) -> Vec<Ident> {
        self.base_timelines.iter().map(Ident::parsed).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ExtensionConfig::from_toml_str("").unwrap();
        assert_eq!(config.content_root, PathBuf::from("mods"));
        assert_eq!(config.characters_path(), PathBuf::from("mods/characters"));
        assert_eq!(config.base_timelines, vec!["standard"]);
    }

    #[test]
    fn test_partial_override() {
        let config = ExtensionConfig::from_toml_str(
            r#"
            content_root = "content"
            base_timelines = ["spring", "summer"]
            "#,
        )
        .unwrap();
        assert_eq!(config.timelines_path(), PathBuf::from("content/timelines"));
        assert_eq!(config.base_order().len(), 2);
        assert_eq!(config.base_order()[0].name(), "spring");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = ExtensionConfig::from_toml_str("content_root = [1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
