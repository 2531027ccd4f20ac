//! Read-only typed views over parsed data files.
//!
//! The raw parser is `serde_json`; these views add what the rest of the
//! framework relies on: every value knows its [`DataPath`], so a malformed
//! field deep inside a file is reported as `.features.speed` rather than as
//! a bare message.

mod path;

pub use path::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A single value inside a parsed data file, with its path.
#[derive(Debug, Clone)]
pub struct DataValue<'a> {
    raw: &'a Value,
    path: DataPath,
}

impl<'a> DataValue<'a> {
    /// View over the root of a parsed file.
    pub fn root(raw: &'a Value) -> Self {
        Self {
            raw,
            path: DataPath::root(),
        }
    }

    /// The path of this value inside its file.
    pub fn path(&self) -> &DataPath {
        &self.path
    }

    /// The underlying raw value.
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    fn type_name(&self) -> &'static str {
        match self.raw {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "list",
            Value::Object(_) => "object",
        }
    }

    fn mismatch(&self, expected: &str) -> DataError {
        DataError::new(
            self.path.clone(),
            format!("expected {expected}, found {}", self.type_name()),
        )
    }

    /// View this value as an object.
    pub fn as_object(&self) -> Result<DataObject<'a>, DataError> {
        match self.raw {
            Value::Object(map) => Ok(DataObject {
                raw: map,
                path: self.path.clone(),
            }),
            _ => Err(self.mismatch("an object")),
        }
    }

    /// View this value as a list.
    pub fn as_list(&self) -> Result<DataList<'a>, DataError> {
        match self.raw {
            Value::Array(items) => Ok(DataList {
                raw: items,
                path: self.path.clone(),
            }),
            _ => Err(self.mismatch("a list")),
        }
    }

    /// Read this value as a string.
    pub fn as_str(&self) -> Result<&'a str, DataError> {
        match self.raw {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch("a string")),
        }
    }

    /// Read this value as a boolean.
    pub fn as_bool(&self) -> Result<bool, DataError> {
        match self.raw {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("a boolean")),
        }
    }

    /// Read this value as an integer.
    pub fn as_i64(&self) -> Result<i64, DataError> {
        self.raw
            .as_i64()
            .ok_or_else(|| self.mismatch("an integer"))
    }

    /// Read this value as a floating-point number.
    pub fn as_f64(&self) -> Result<f64, DataError> {
        self.raw
            .as_f64()
            .ok_or_else(|| self.mismatch("a number"))
    }

    /// Read this value as a list of strings.
    pub fn string_list(&self) -> Result<Vec<String>, DataError> {
        let list = self.as_list()?;
        list.iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    /// Deserialize this value into any serde-compatible type.
    ///
    /// Deserialization failures are reported at this value's path; nested
    /// detail stays in the message.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DataError> {
        serde_json::from_value(self.raw.clone())
            .map_err(|e| DataError::new(self.path.clone(), e.to_string()))
    }
}

/// An object (string-keyed map) inside a parsed data file.
#[derive(Debug, Clone)]
pub struct DataObject<'a> {
    raw: &'a serde_json::Map<String, Value>,
    path: DataPath,
}

impl<'a> DataObject<'a> {
    /// The path of this object inside its file.
    pub fn path(&self) -> &DataPath {
        &self.path
    }

    /// Look up a field, if present.
    pub fn get(&self, key: &str) -> Option<DataValue<'a>> {
        self.raw.get(key).map(|value| DataValue {
            raw: value,
            path: self.path.field(key),
        })
    }

    /// Look up a mandatory field.
    pub fn require(&self, key: &str) -> Result<DataValue<'a>, DataError> {
        self.get(key).ok_or_else(|| {
            DataError::new(self.path.clone(), format!("missing required field `{key}`"))
        })
    }

    /// Check whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Iterate over all fields in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, DataValue<'a>)> + '_ {
        self.raw.iter().map(|(key, value)| {
            (
                key.as_str(),
                DataValue {
                    raw: value,
                    path: self.path.field(key),
                },
            )
        })
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check whether the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// A list inside a parsed data file.
#[derive(Debug, Clone)]
pub struct DataList<'a> {
    raw: &'a Vec<Value>,
    path: DataPath,
}

impl<'a> DataList<'a> {
    /// The path of this list inside its file.
    pub fn path(&self) -> &DataPath {
        &self.path
    }

    /// Look up an element, if present.
    pub fn get(&self, index: usize) -> Option<DataValue<'a>> {
        self.raw.get(index).map(|value| DataValue {
            raw: value,
            path: self.path.index(index),
        })
    }

    /// Iterate over all elements.
    pub fn iter(&self) -> impl Iterator<Item = DataValue<'a>> + '_ {
        self.raw.iter().enumerate().map(|(index, value)| DataValue {
            raw: value,
            path: self.path.index(index),
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
