//! Reference synchronization
//!
//! - **filter**: choose the packages a run touches
//! - **references**: turn dependency names into project references
//! - **mutator**: apply structural edits to a tsconfig
//! - **esm**: generate the ES-module tsconfig
//! - **check**: compare a mutated tsconfig with its original
//! - **report**: aggregate the run outcome

mod check;
mod engine;
mod esm;
mod filter;
mod mutator;
mod references;
mod report;

pub use check::{TsconfigMismatch, compare};
pub use engine::SyncEngine;
pub use esm::{esm_document, esm_path};
pub use filter::PackageFilter;
pub use mutator::TsconfigMutator;
pub use references::{ProjectReference, ReferenceResolver};
pub use report::SyncReport;
