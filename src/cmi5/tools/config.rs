use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::cmi5::tools::compile::ArchiveMode;
use crate::cmi5::tools::error::{Result, ToolError};
use crate::cmi5::tools::io::archive::{Archiver, CommandArchiver, NativeArchiver};
use crate::cmi5::tools::io::package_write::CollisionPolicy;

/// Command-line arguments of the `cmi5-tools` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cmi5-tools",
    version,
    before_help = "CMI5 Generator",
    about = "Compile CMI5 packages for each row in a CSV based on a template."
)]
pub struct CompileArgs {
    /// File containing a mustache template
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// CSV (with headers) to run each row through the template
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Where to save compiled templates
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Column to use as the name of the package
    #[arg(long)]
    pub package_name_column: Option<String>,

    /// When to zip package directories
    #[arg(long, value_enum, default_value_t = ArchiveModeKind::Inline)]
    pub archive_mode: ArchiveModeKind,

    /// How to produce the zip archives
    #[arg(long, value_enum, default_value_t = ArchiverKind::ZipCommand)]
    pub archiver: ArchiverKind,

    /// What to do when two rows produce the same package name
    #[arg(long, value_enum, default_value_t = CollisionKind::Error)]
    pub on_collision: CollisionKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArchiveModeKind {
    /// Zip each package as soon as its row is written
    Inline,
    /// Zip every directory in the output folder after the last row
    Batch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArchiverKind {
    /// Run the external `zip` utility
    ZipCommand,
    /// Write archives in-process
    Native,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CollisionKind {
    /// Abort the run
    Error,
    /// Overwrite the earlier package
    Overwrite,
}

impl From<ArchiveModeKind> for ArchiveMode {
    fn from(kind: ArchiveModeKind) -> Self {
        match kind {
            ArchiveModeKind::Inline => ArchiveMode::Inline,
            ArchiveModeKind::Batch => ArchiveMode::Batch,
        }
    }
}

impl From<CollisionKind> for CollisionPolicy {
    fn from(kind: CollisionKind) -> Self {
        match kind {
            CollisionKind::Error => CollisionPolicy::Error,
            CollisionKind::Overwrite => CollisionPolicy::Overwrite,
        }
    }
}

impl ArchiverKind {
    /// Builds the archiver this kind selects.
    pub fn archiver(self) -> Box<dyn Archiver> {
        match self {
            ArchiverKind::ZipCommand => Box::new(CommandArchiver::zip()),
            ArchiverKind::Native => Box::new(NativeArchiver),
        }
    }
}

/// Settings for a single compile run.
///
/// Paths stay unset when the flag was omitted; the accessors report the
/// missing option only when the path is actually needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileConfig {
    pub template: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub package_name_column: Option<String>,
    pub archive_mode: ArchiveMode,
    pub on_collision: CollisionPolicy,
}

impl CompileConfig {
    pub fn template_path(&self) -> Result<&Path> {
        required(&self.template, "template")
    }

    pub fn source_path(&self) -> Result<&Path> {
        required(&self.source, "source")
    }

    pub fn output_path(&self) -> Result<&Path> {
        required(&self.output, "output")
    }
}

fn required<'a>(path: &'a Option<PathBuf>, option: &'static str) -> Result<&'a Path> {
    path.as_deref().ok_or(ToolError::MissingOption(option))
}

impl From<&CompileArgs> for CompileConfig {
    fn from(args: &CompileArgs) -> Self {
        Self {
            template: args.template.clone(),
            source: args.source.clone(),
            output: args.output.clone(),
            package_name_column: args.package_name_column.clone(),
            archive_mode: args.archive_mode.into(),
            on_collision: args.on_collision.into(),
        }
    }
}
