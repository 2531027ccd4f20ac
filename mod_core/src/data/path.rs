//! Field paths for diagnostics on parsed data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path to a field inside a parsed data file, e.g. `.features.nocturnal`
/// or `.cast[2]`. The root of a file is the empty path, displayed as `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DataPath(String);

impl DataPath {
    /// The root of a data file.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to a named field below this one.
    pub fn field(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    /// Path to a list element below this one.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// Check whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A malformed-data error carrying the offending field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {path}")]
pub struct DataError {
    pub path: DataPath,
    pub message: String,
}

impl DataError {
    /// Create a new error for the given path.
    pub fn new(path: DataPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let path = DataPath::root().field("features").field("nocturnal");
        assert_eq!(path.to_string(), ".features.nocturnal");

        let indexed = DataPath::root().field("cast").index(2);
        assert_eq!(indexed.to_string(), ".cast[2]");
    }

    #[test]
    fn test_root_display() {
        assert_eq!(DataPath::root().to_string(), ".");
        assert!(DataPath::root().is_root());
        assert!(!DataPath::root().field("id").is_root());
    }

    #[test]
    fn test_error_display() {
        let err = DataError::new(
            DataPath::root().field("speed"),
            "expected a number",
        );
        assert_eq!(err.to_string(), "expected a number at .speed");
    }
}
