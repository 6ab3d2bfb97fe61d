use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::cmi5::tools::config::CompileConfig;
use crate::cmi5::tools::error::Result;
use crate::cmi5::tools::io::archive::{Archiver, archive_and_clean};
use crate::cmi5::tools::io::csv_read::RowSource;
use crate::cmi5::tools::io::package_write::PackageBuilder;
use crate::cmi5::tools::io::template::load_template;
use crate::cmi5::tools::model::PackageName;

/// When package directories are turned into archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveMode {
    /// Archive each package right after its row is written.
    #[default]
    Inline,
    /// Archive every directory in the output folder once all rows are
    /// written, including directories this run did not create.
    Batch,
}

/// Outcome of a successful compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Packages built from rows, in row order.
    pub packages: Vec<PackageName>,
    /// Archives written, in the order they were produced.
    pub archives: Vec<PathBuf>,
}

/// Compiles one package per CSV row and archives them.
#[instrument(level = "info", skip_all, fields(mode = ?config.archive_mode))]
pub fn compile(config: &CompileConfig, archiver: &dyn Archiver) -> Result<CompileSummary> {
    let template = load_template(config.template_path()?)?;
    let rows = RowSource::open(config.source_path()?)?;
    let output_dir = config.output_path()?;

    let mut builder = PackageBuilder::new(
        output_dir,
        config.package_name_column.clone(),
        config.on_collision,
    );
    let mut summary = CompileSummary::default();

    for row in rows {
        let row = row?;
        let package = builder.build(&template, &row)?;
        if config.archive_mode == ArchiveMode::Inline {
            let archive = archive_and_clean(archiver, output_dir, &package.name)?;
            summary.archives.push(archive);
        }
        summary.packages.push(package.name);
    }
    info!(
        package_count = summary.packages.len(),
        fallback_count = builder.fallback_count(),
        "all rows processed"
    );

    if config.archive_mode == ArchiveMode::Batch {
        for name in package_directories(output_dir)? {
            let archive = archive_and_clean(archiver, output_dir, &name)?;
            summary.archives.push(archive);
        }
    }

    Ok(summary)
}

/// Lists the immediate child directories of `output_dir`, sorted by name.
pub fn package_directories(output_dir: &Path) -> Result<Vec<PackageName>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        names.push(PackageName::from_dir_name(
            entry.file_name().to_string_lossy().into_owned(),
        ));
    }
    names.sort();
    debug!(directory_count = names.len(), "enumerated output directory");
    Ok(names)
}
