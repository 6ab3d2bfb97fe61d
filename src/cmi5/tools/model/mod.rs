use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path};

use serde::Serialize;

use crate::cmi5::tools::error::{Result, ToolError};

/// Name of the file every package carries.
pub const MANIFEST_FILE: &str = "cmi5.xml";

/// A single CSV record keyed by header name.
///
/// Cells beyond the end of a short record are absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    /// Returns the value stored under `column`, if the record had one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Directory and archive stem of a package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Lower-cases `value` and replaces every space with a hyphen. No other
    /// characters are touched.
    pub fn slug(value: &str) -> Self {
        Self(value.to_lowercase().replace(' ', "-"))
    }

    /// Positional name used when a row has no value in the naming column.
    pub fn fallback(index: usize) -> Self {
        Self(format!("row-{index}"))
    }

    /// Wraps an existing directory name verbatim.
    pub fn from_dir_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Rejects names that are not exactly one plain path component, such as
    /// an empty name, `.`, `..` or anything containing a separator.
    pub fn ensure_single_component(&self) -> Result<()> {
        let mut components = Path::new(&self.0).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == self.0.as_str() => Ok(()),
            _ => Err(ToolError::InvalidPackageName {
                name: self.0.clone(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the archive produced for this package.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
