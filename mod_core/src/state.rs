//! The assembled extension layer and its reload entry point.

use crate::config::ExtensionConfig;
use crate::content::{CharacterDef, SceneDef, Timeline};
use crate::features::FeatureRegistry;
use crate::registry::{ContentRegistry, LoadContext, ScanReport};
use crate::resolver::TimelineResolver;

/// Combined outcome of one reload across every content registry.
#[derive(Debug, Default)]
pub struct ReloadSummary {
    pub characters: ScanReport,
    pub scenes: ScanReport,
    pub timelines: ScanReport,
}

impl ReloadSummary {
    /// Total entries loaded across all registries.
    pub fn loaded(&self) -> usize {
        self.characters.loaded.len() + self.scenes.loaded.len() + self.timelines.loaded.len()
    }

    /// Total files that failed to load.
    pub fn failed(&self) -> usize {
        self.characters.errors.len() + self.scenes.errors.len() + self.timelines.errors.len()
    }

    /// Check whether every candidate file loaded.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Everything the extension layer owns: the feature namespace, one registry
/// per content kind, and the timeline resolver.
///
/// The host drives [`reload`](Self::reload) during its loading phase; all
/// other access is read-only queries.
#[derive(Debug)]
pub struct ExtensionState {
    config: ExtensionConfig,
    features: FeatureRegistry,
    pub characters: ContentRegistry<CharacterDef>,
    pub scenes: ContentRegistry<SceneDef>,
    pub timelines: ContentRegistry<Timeline>,
    pub resolver: TimelineResolver,
}

impl ExtensionState {
    /// Assemble the extension layer around a fully-populated feature
    /// registry.
    pub fn new(config: ExtensionConfig, features: FeatureRegistry) -> Self {
        let resolver = TimelineResolver::new(config.base_order());
        Self {
            config,
            features,
            characters: ContentRegistry::new("characters"),
            scenes: ContentRegistry::new("scenes"),
            timelines: ContentRegistry::new("timelines"),
            resolver,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// The feature namespace.
    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// Rescan every configured content directory and invalidate cached
    /// orderings.
    ///
    /// Failures stay file-local: a broken file is reported in the summary
    /// while the rest of the content loads. Cached timeline orderings never
    /// survive a reload.
    pub fn reload(&mut self) -> ReloadSummary {
        tracing::info!(root = %self.config.content_root.display(), "reloading extension content");
        let summary = ReloadSummary {
            characters: self
                .characters
                .scan_directory(&self.config.characters_path(), &LoadContext {
                    features: &self.features,
                }),
            scenes: self
                .scenes
                .scan_directory(&self.config.scenes_path(), &LoadContext {
                    features: &self.features,
                }),
            timelines: self
                .timelines
                .scan_directory(&self.config.timelines_path(), &LoadContext {
                    features: &self.features,
                }),
        };
        self.resolver.invalidate();
        tracing::info!(
            loaded = summary.loaded(),
            failed = summary.failed(),
            "extension content reloaded"
        );
        summary
    }
}
