//! Command implementations for tsrefs-cli

pub mod sync;

pub use sync::run_sync;
