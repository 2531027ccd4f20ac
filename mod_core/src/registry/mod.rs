//! Keyed stores of externally-declared content entries.
//!
//! A [`ContentRegistry`] owns one identifier namespace and the entries
//! claimed in it. Entries are built by the value type's [`ContentSource`]
//! factory from parsed file data. The registry's core guarantee is
//! atomicity: an entry either fully exists (id claimed, value constructed,
//! record indexed) or not at all - a factory failure releases the claim
//! before the error propagates.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::{DataError, DataObject, DataPath, DataValue};
use crate::features::FeatureRegistry;
use crate::ident::{Ident, IdentPool};

/// Everything a content factory may consult while building an entry.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    /// The fully-populated feature namespace.
    pub features: &'a FeatureRegistry,
}

/// Factory trait for content entry types.
pub trait ContentSource: Sized {
    /// Build an entry from its claimed key and parsed data.
    ///
    /// Runs exactly once per entry. Returning an error makes the registry
    /// release the key's claim before propagating.
    fn from_data(
        key: Ident,
        data: &DataObject<'_>,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, ContentError>;

    /// The entry's claimed key.
    fn key(&self) -> &Ident;
}

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The mandatory `id` field is absent.
    #[error("missing required `id` field at {path}")]
    MissingId { path: DataPath },

    /// Another entry already claimed this id. Always a configuration error.
    #[error("content id `{name}` is already defined")]
    DuplicateId { name: String },

    /// Lookup or removal of an id with no entry behind it.
    #[error("no entry registered for `{name}`")]
    NotFound { name: String },

    /// A timeline may anchor on one side only.
    #[error("timeline `{name}` declares both `insert_before` and `insert_after`")]
    ConflictingAnchors { name: String },

    /// A malformed field, with its path for diagnostics.
    #[error(transparent)]
    Data(#[from] DataError),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not parseable as structured data.
    #[error("unreadable content file {path}: {message}")]
    Format { path: PathBuf, message: String },
}

impl ContentError {
    /// The structured-data path carried by this error, if any.
    pub fn data_path(&self) -> Option<&DataPath> {
        match self {
            ContentError::MissingId { path } => Some(path),
            ContentError::Data(err) => Some(&err.path),
            _ => None,
        }
    }
}

/// One load failure recorded during a directory scan.
#[derive(Debug)]
pub struct ScanError {
    pub path: PathBuf,
    pub error: ContentError,
}

/// Outcome of a directory scan: what loaded and what failed.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub loaded: Vec<Ident>,
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    /// Check whether every candidate file loaded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug)]
struct Record<V> {
    origin: Option<PathBuf>,
    value: V,
}

/// A keyed store of content entries with file-backed reload.
#[derive(Debug)]
pub struct ContentRegistry<V> {
    label: &'static str,
    idents: IdentPool,
    records: HashMap<Ident, Record<V>>,
}

impl<V: ContentSource> ContentRegistry<V> {
    /// Create a new empty registry. `label` names it in log output.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            idents: IdentPool::new(),
            records: HashMap::new(),
        }
    }

    /// Register an entry built from already-parsed data.
    ///
    /// Claims the mandatory `id`, runs the factory, and indexes the result.
    /// On factory failure the claim is released before the error propagates,
    /// leaving the registry and the identifier namespace exactly as before
    /// the call.
    pub fn add(&mut self, data: &DataObject<'_>, ctx: &LoadContext<'_>) -> Result<Ident, ContentError> {
        self.add_with_origin(data, ctx, None)
    }

    /// Read and parse a file, then register its entry with the file recorded
    /// as the entry's origin.
    pub fn add_from_file(
        &mut self,
        path: &Path,
        ctx: &LoadContext<'_>,
    ) -> Result<Ident, ContentError> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ContentError::Format {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let root = DataValue::root(&raw);
        let data = root.as_object()?;
        self.add_with_origin(&data, ctx, Some(path.to_path_buf()))
    }

    fn add_with_origin(
        &mut self,
        data: &DataObject<'_>,
        ctx: &LoadContext<'_>,
        origin: Option<PathBuf>,
    ) -> Result<Ident, ContentError> {
        let name = match data.get("id") {
            Some(value) => value.as_str()?.to_string(),
            None => {
                return Err(ContentError::MissingId {
                    path: data.path().clone(),
                })
            }
        };
        let key = self
            .idents
            .claim(&name)
            .map_err(|_| ContentError::DuplicateId { name })?;
        match V::from_data(key.clone(), data, ctx) {
            Ok(value) => {
                self.records.insert(key.clone(), Record { origin, value });
                Ok(key)
            }
            Err(err) => {
                self.idents.release(&key).ok();
                Err(err)
            }
        }
    }

    /// Remove an entry, releasing its identifier for reuse.
    pub fn remove(&mut self, key: &Ident) -> Result<V, ContentError> {
        let record = self.records.remove(key).ok_or_else(|| ContentError::NotFound {
            name: key.name().to_string(),
        })?;
        self.idents.release(key).ok();
        Ok(record.value)
    }

    /// Scan a directory of `*.json` files, reloading each one independently.
    ///
    /// A file whose path matches a current record's origin replaces that
    /// record (remove first, then add), so a file cannot leave a stale entry
    /// behind under a different id. A failure on one file is logged and
    /// recorded in the report; the scan continues with the remaining files.
    pub fn scan_directory(&mut self, dir: &Path, ctx: &LoadContext<'_>) -> ScanReport {
        let mut report = ScanReport::default();
        let files = match list_data_files(dir) {
            Ok(files) => files,
            Err(source) => {
                let error = ContentError::Io {
                    path: dir.to_path_buf(),
                    source,
                };
                tracing::warn!(registry = self.label, error = %error, "content scan failed");
                report.errors.push(ScanError {
                    path: dir.to_path_buf(),
                    error,
                });
                return report;
            }
        };
        for file in files {
            if let Some(stale) = self.key_for_path(&file) {
                self.remove(&stale).ok();
            }
            match self.add_from_file(&file, ctx) {
                Ok(key) => {
                    tracing::debug!(registry = self.label, id = %key, path = %file.display(), "loaded content file");
                    report.loaded.push(key);
                }
                Err(error) => {
                    match error.data_path() {
                        Some(path) => tracing::warn!(
                            registry = self.label,
                            file = %file.display(),
                            field = %path,
                            error = %error,
                            "skipping content file"
                        ),
                        None => tracing::warn!(
                            registry = self.label,
                            file = %file.display(),
                            error = %error,
                            "skipping content file"
                        ),
                    }
                    report.errors.push(ScanError { path: file, error });
                }
            }
        }
        report
    }

    fn key_for_path(&self, path: &Path) -> Option<Ident> {
        self.records
            .iter()
            .find(|(_, record)| {
                record
                    .origin
                    .as_deref()
                    .is_some_and(|origin| paths_match(origin, path))
            })
            .map(|(key, _)| key.clone())
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &Ident) -> Option<&V> {
        self.records.get(key).map(|record| &record.value)
    }

    /// Look up an entry by name.
    pub fn by_name(&self, name: &str) -> Option<&V> {
        let key = self.idents.get(name)?;
        self.get(&key)
    }

    /// Look up the entry loaded from `path`, matching case-insensitively.
    pub fn by_path(&self, path: &Path) -> Option<&V> {
        let key = self.key_for_path(path)?;
        self.get(&key)
    }

    /// Look up an entry, falling back to a caller-supplied default.
    pub fn get_or<'a>(&'a self, key: &Ident, fallback: &'a V) -> &'a V {
        self.get(key).unwrap_or(fallback)
    }

    /// Check whether a key has an entry.
    pub fn contains(&self, key: &Ident) -> bool {
        self.records.contains_key(key)
    }

    /// The registry's identifier namespace.
    pub fn idents(&self) -> &IdentPool {
        &self.idents
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.records.values().map(|record| &record.value)
    }

    /// Iterate over all claimed keys.
    pub fn keys(&self) -> impl Iterator<Item = &Ident> {
        self.records.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Candidate data files under `dir`: `*.json`, sorted by file name so scan
/// reports are deterministic.
fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn paths_match(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{AttributeList, Feature};

    /// Minimal entry type for registry tests: requires a `name` field and
    /// parses an optional `features` block.
    #[derive(Debug)]
    struct TestEntry {
        key: Ident,
        name: String,
        attributes: AttributeList,
    }

    impl ContentSource for TestEntry {
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

    fn features() -> FeatureRegistry {
        let mut features = FeatureRegistry::new();
        features
            .declare(Feature::<bool>::deserialized("nocturnal"))
            .unwrap();
        features
    }

    fn add_json(
        registry: &mut ContentRegistry<TestEntry>,
        features: &FeatureRegistry,
        text: &str,
    ) -> Result<Ident, ContentError> {
        let raw: serde_json::Value = serde_json::from_str(text).unwrap();
        let root = DataValue::root(&raw);
        let data = root.as_object().unwrap();
        registry.add(&data, &LoadContext { features })
    }

    #[test]
    fn test_add_and_lookups() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");

        let key = add_json(&mut registry, &features, r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        assert!(key.is_claimed());
        assert_eq!(registry.get(&key).unwrap().name, "Fox");
        assert_eq!(registry.by_name("fox").unwrap().key(), &key);
        assert!(registry.contains(&key));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_id_rejected_before_factory() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");

        let err = add_json(&mut registry, &features, r#"{"name": "Fox"}"#).unwrap_err();
        assert!(matches!(err, ContentError::MissingId { .. }));
        assert!(registry.is_empty());
        assert!(registry.idents().is_empty());
    }

    #[test]
    fn test_duplicate_id_is_hard_error() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");

        add_json(&mut registry, &features, r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        let err =
            add_json(&mut registry, &features, r#"{"id": "fox", "name": "Vixen"}"#).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { ref name } if name == "fox"));
        assert_eq!(registry.by_name("fox").unwrap().name, "Fox");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_factory_failure_rolls_back_claim() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");

        // `name` missing: the factory fails after the id was claimed.
        let err = add_json(&mut registry, &features, r#"{"id": "wolf"}"#).unwrap_err();
        assert!(matches!(err, ContentError::Data(_)));

        // Registry and identifier namespace are exactly as before the call.
        assert!(registry.is_empty());
        assert!(!registry.idents().is_claimed("wolf"));

        // The name is immediately reusable.
        add_json(&mut registry, &features, r#"{"id": "wolf", "name": "Wolf"}"#).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_releases_identifier() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");

        let key = add_json(&mut registry, &features, r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        let removed = registry.remove(&key).unwrap();
        assert_eq!(removed.name, "Fox");
        assert!(!key.is_claimed());
        assert!(registry.is_empty());

        let err = registry.remove(&key).unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));

        // The id is reusable after removal.
        add_json(&mut registry, &features, r#"{"id": "fox", "name": "Fox II"}"#).unwrap();
    }

    #[test]
    fn test_scan_directory_partial_failure() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let dir = tempfile::tempdir().unwrap();

        fs::write(
            dir.path().join("fox.json"),
            r#"{"id": "fox", "name": "Fox", "features": {"nocturnal": false}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("wolf.json"),
            r#"{"id": "wolf", "name": "Wolf", "features": {"unknown_feature": true}}"#,
        )
        .unwrap();

        let report = registry.scan_directory(dir.path(), &LoadContext { features: &features });

        // fox loads; wolf is rejected without aborting the scan.
        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.loaded[0].name(), "fox");
        assert!(registry.by_name("fox").is_some());
        assert!(registry.by_name("wolf").is_none());

        assert_eq!(report.errors.len(), 1);
        let failure = &report.errors[0];
        assert!(failure.path.ends_with("wolf.json"));
        assert_eq!(
            failure.error.data_path().unwrap().to_string(),
            ".features.unknown_feature"
        );
    }

    #[test]
    fn test_scan_twice_is_idempotent() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("fox.json"), r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        fs::write(dir.path().join("wolf.json"), r#"{"id": "wolf", "name": "Wolf"}"#).unwrap();

        let ctx = LoadContext { features: &features };
        let first = registry.scan_directory(dir.path(), &ctx);
        assert!(first.is_clean());
        assert_eq!(registry.len(), 2);

        let second = registry.scan_directory(dir.path(), &ctx);
        assert!(second.is_clean());
        assert_eq!(second.loaded.len(), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.by_name("fox").unwrap().name, "Fox");
        assert_eq!(registry.by_name("wolf").unwrap().name, "Wolf");
    }

    #[test]
    fn test_rescan_replaces_by_path_even_when_id_changes() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fox.json");

        fs::write(&file, r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        let ctx = LoadContext { features: &features };
        registry.scan_directory(dir.path(), &ctx);

        // The file changes its id; the stale `fox` entry must not linger.
        fs::write(&file, r#"{"id": "arctic_fox", "name": "Arctic Fox"}"#).unwrap();
        registry.scan_directory(dir.path(), &ctx);

        assert_eq!(registry.len(), 1);
        assert!(registry.by_name("fox").is_none());
        assert!(registry.by_name("arctic_fox").is_some());
        assert_eq!(registry.by_path(&file).unwrap().name, "Arctic Fox");
    }

    #[test]
    fn test_by_path_is_case_insensitive() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Fox.json");

        fs::write(&file, r#"{"id": "fox", "name": "Fox"}"#).unwrap();
        registry
            .add_from_file(&file, &LoadContext { features: &features })
            .unwrap();

        let lowered = dir.path().join("fox.json");
        assert!(registry.by_path(&lowered).is_some());
    }

    #[test]
    fn test_unreadable_file_is_format_error() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("broken.json"), "not json at all").unwrap();
        let report = registry.scan_directory(dir.path(), &LoadContext { features: &features });

        assert!(report.loaded.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0].error, ContentError::Format { .. }));
    }

    #[test]
    fn test_get_or_falls_back() {
        let features = features();
        let mut registry = ContentRegistry::<TestEntry>::new("characters");
        let key = add_json(&mut registry, &features, r#"{"id": "fox", "name": "Fox"}"#).unwrap();

        let fallback = TestEntry {
            key: Ident::parsed("fallback"),
            name: "Fallback".to_string(),
            attributes: AttributeList::new(),
        };
        assert_eq!(registry.get_or(&key, &fallback).name, "Fox");
        assert_eq!(
            registry.get_or(&Ident::parsed("ghost"), &fallback).name,
            "Fallback"
        );
    }
}
