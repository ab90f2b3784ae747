//! Storage layer
//!
//! The catalog lives in a single UTF-8 text file, one `title,author,year`
//! record per line. `format` owns the line codec, `file` the raw I/O.

pub mod error;
pub mod file;
pub mod format;

pub use error::{Access, StorageError, StorageResult};
pub use format::{format_catalog, format_line, needs_escaping, parse_line, LineError};
