use std::fs;
use std::path::Path;

use mustache::Template;
use tracing::{debug, instrument};

use crate::cmi5::tools::error::Result;
use crate::cmi5::tools::model::Row;

/// A compiled mustache package template.
///
/// `{{field}}` escapes `& < > " '`, `{{{field}}}` and `{{& field}}` insert the
/// value raw, and placeholders without a matching column render as empty
/// text. Tag names are looked up verbatim, so headers containing spaces work.
pub struct PackageTemplate {
    template: Template,
}

impl PackageTemplate {
    /// Compiles template text held in memory.
    pub fn from_source(source: &str) -> Result<Self> {
        Ok(Self {
            template: mustache::compile_str(source)?,
        })
    }

    /// Renders the template against the fields of `row`.
    pub fn render(&self, row: &Row) -> Result<String> {
        Ok(self.template.render_to_string(row)?)
    }
}

/// Reads the template file at `path` once and compiles it.
#[instrument(level = "info", skip_all, fields(template = %path.display()))]
pub fn load_template(path: &Path) -> Result<PackageTemplate> {
    let source = fs::read_to_string(path)?;
    debug!(bytes = source.len(), "template loaded");
    PackageTemplate::from_source(&source)
}
