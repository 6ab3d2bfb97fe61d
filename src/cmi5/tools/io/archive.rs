use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::cmi5::tools::error::{Result, ToolError};
use crate::cmi5::tools::model::PackageName;

/// Turns a package directory inside `output_dir` into `<name>.zip` next to it.
///
/// Entry paths inside the archive are relative to `output_dir`, so the
/// archive holds a single top-level `<name>/` directory.
pub trait Archiver {
    fn archive(&self, output_dir: &Path, package: &PackageName) -> Result<PathBuf>;
}

/// A program invocation handed to a [`ProcessRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Runs an external program and reports its exit code.
///
/// `Ok(None)` means the process ended without an exit code (killed by a
/// signal).
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<Option<i32>>;
}

/// Spawns real processes through [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Option<i32>> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .output()?;

        debug!(
            program = %invocation.program,
            stdout = %String::from_utf8_lossy(&output.stdout),
            "process finished"
        );
        if !output.status.success() {
            warn!(
                program = %invocation.program,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "process reported failure"
            );
        }

        Ok(output.status.code())
    }
}

/// Archives by shelling out to `zip -r <name>.zip <name>` in the output
/// directory.
pub struct CommandArchiver<R = SystemRunner> {
    program: String,
    runner: R,
}

impl CommandArchiver<SystemRunner> {
    /// Archiver backed by the `zip` program on `PATH`.
    pub fn zip() -> Self {
        Self::with_runner("zip", SystemRunner)
    }
}

impl<R: ProcessRunner> CommandArchiver<R> {
    pub fn with_runner(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: ProcessRunner> Archiver for CommandArchiver<R> {
    fn archive(&self, output_dir: &Path, package: &PackageName) -> Result<PathBuf> {
        let archive_name = package.archive_file_name();
        let invocation = Invocation {
            program: self.program.clone(),
            args: vec![
                "-r".to_string(),
                archive_name.clone(),
                package.as_str().to_string(),
            ],
            working_dir: output_dir.to_path_buf(),
        };

        match self.runner.run(&invocation)? {
            Some(0) => Ok(output_dir.join(archive_name)),
            code => Err(ToolError::ArchiveCommand {
                program: self.program.clone(),
                code,
            }),
        }
    }
}

/// Writes the archive in-process with the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeArchiver;

impl Archiver for NativeArchiver {
    fn archive(&self, output_dir: &Path, package: &PackageName) -> Result<PathBuf> {
        let archive_path = output_dir.join(package.archive_file_name());
        let package_dir = output_dir.join(package.as_str());

        let mut writer = ZipWriter::new(File::create(&archive_path)?);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in WalkDir::new(&package_dir).sort_by_file_name() {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(output_dir)
                .map_err(|_| ToolError::InvalidEntryPath(entry.path().to_path_buf()))?;
            let name = entry_name(relative)?;

            if entry.file_type().is_dir() {
                writer.add_directory(format!("{name}/"), options)?;
            } else {
                writer.start_file(name, options)?;
                let mut source = File::open(entry.path())?;
                io::copy(&mut source, &mut writer)?;
            }
        }

        writer.finish()?;
        Ok(archive_path)
    }
}

// Zip entry names always use forward slashes.
fn entry_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(ToolError::InvalidEntryPath(relative.to_path_buf())),
            },
            _ => return Err(ToolError::InvalidEntryPath(relative.to_path_buf())),
        }
    }
    Ok(parts.join("/"))
}

/// Archives the package directory, then removes it.
#[instrument(level = "info", skip_all, fields(package = %package))]
pub fn archive_and_clean(
    archiver: &dyn Archiver,
    output_dir: &Path,
    package: &PackageName,
) -> Result<PathBuf> {
    package.ensure_single_component()?;
    println!("ZIPPING: {package}");
    let archive = archiver.archive(output_dir, package)?;
    fs::remove_dir_all(output_dir.join(package.as_str()))?;
    info!(archive = %archive.display(), "package archived");
    Ok(archive)
}
