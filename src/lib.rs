//! Core library for the cmi5-tools command line application.
//!
//! The library turns each row of a CSV file into a zipped CMI5 package by
//! rendering a template. IO adapters (CSV rows, templates, package directories
//! and archivers) live under [`cmi5::tools::io`], row and package naming types
//! inside [`cmi5::tools::model`], command-line settings in
//! [`cmi5::tools::config`], and the pipeline itself under
//! [`cmi5::tools::compile`].

pub mod cmi5;

pub use cmi5::tools::{Result, ToolError, compile, config, error, io, model};
