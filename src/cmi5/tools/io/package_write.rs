use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::cmi5::tools::error::{Result, ToolError};
use crate::cmi5::tools::io::template::PackageTemplate;
use crate::cmi5::tools::model::{MANIFEST_FILE, PackageName, Row};

/// What to do when a row derives a package name already used in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Abort the run before the duplicate is written.
    #[default]
    Error,
    /// Reuse the directory and overwrite its manifest.
    Overwrite,
}

/// A package directory that has been written but not yet archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPackage {
    pub name: PackageName,
    pub directory: PathBuf,
    pub manifest: PathBuf,
}

/// Writes one package directory per row.
///
/// Holds the running state of a compile: the fallback counter and the names
/// produced so far.
pub struct PackageBuilder {
    output_dir: PathBuf,
    name_column: Option<String>,
    policy: CollisionPolicy,
    fallback_count: usize,
    produced: HashSet<PackageName>,
}

impl PackageBuilder {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        name_column: Option<String>,
        policy: CollisionPolicy,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            name_column,
            policy,
            fallback_count: 0,
            produced: HashSet::new(),
        }
    }

    /// Number of rows so far that fell back to a positional name.
    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }

    /// Derives the package name for `row`, advancing the fallback counter
    /// when the naming column is unset, absent or blank.
    pub fn package_name(&mut self, row: &Row) -> PackageName {
        let value = self
            .name_column
            .as_deref()
            .and_then(|column| row.get(column))
            .filter(|value| !value.is_empty());

        match value {
            Some(value) => PackageName::slug(value),
            None => {
                self.fallback_count += 1;
                PackageName::fallback(self.fallback_count)
            }
        }
    }

    /// Creates the package directory for `row` and writes the rendered
    /// manifest into it.
    #[instrument(level = "debug", skip_all, fields(output = %self.output_dir.display()))]
    pub fn build(&mut self, template: &PackageTemplate, row: &Row) -> Result<BuiltPackage> {
        let name = self.package_name(row);
        name.ensure_single_component()?;

        if !self.produced.insert(name.clone()) && self.policy == CollisionPolicy::Error {
            return Err(ToolError::DuplicatePackage {
                name: name.to_string(),
            });
        }

        let directory = self.output_dir.join(name.as_str());
        fs::create_dir_all(&directory)?;

        let rendered = template.render(row)?;
        let manifest = directory.join(MANIFEST_FILE);
        fs::write(&manifest, rendered.as_bytes())?;
        debug!(package = %name, bytes = rendered.len(), "package manifest written");

        Ok(BuiltPackage {
            name,
            directory,
            manifest,
        })
    }
}
