//! Filesystem layer for tsrefs
//!
//! Provides slash-normalized path algebra (relative paths, descendant tests)
//! and safe I/O operations for manifests and tsconfig documents.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
