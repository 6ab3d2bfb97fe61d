pub mod compile;
pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use error::{Result, ToolError};
