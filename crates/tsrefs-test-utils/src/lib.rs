//! Shared test utilities for the tsrefs workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`monorepo`]: [`TestMonorepo`] builder for package layouts on disk

pub mod monorepo;

pub use monorepo::TestMonorepo;
