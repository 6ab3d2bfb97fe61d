use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool reads its inputs, renders packages, or archives them.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the CSV reader cannot decode a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when a CSV record does not line up with the header row.
    #[error("invalid CSV at line {line}: {message}")]
    InvalidCsv { line: u64, message: String },

    /// Raised when the template cannot be compiled or a row cannot be rendered.
    #[error("template error: {0}")]
    Template(#[from] mustache::Error),

    /// Errors bubbled up from the native archive writer.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Raised when walking a package directory fails.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Raised when the external archive command exits unsuccessfully.
    #[error("archive command '{program}' failed (exit code {code:?})")]
    ArchiveCommand { program: String, code: Option<i32> },

    /// Raised when two rows in one run derive the same package name.
    #[error("duplicate package name '{name}' (already produced earlier in this run)")]
    DuplicatePackage { name: String },

    /// Raised when a derived package name is not a single plain directory name.
    #[error("package name '{name}' is not a usable directory name")]
    InvalidPackageName { name: String },

    /// Raised when a path option was never supplied but is needed.
    #[error("option --{0} was not provided")]
    MissingOption(&'static str),

    /// Raised when a path inside a package cannot be expressed as an archive entry.
    #[error("cannot archive path {0}")]
    InvalidEntryPath(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
