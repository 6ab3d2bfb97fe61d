pub mod archive;
pub mod csv_read;
pub mod package_write;
pub mod template;
