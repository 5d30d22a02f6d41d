//! JSON-with-comments documents for tsrefs
//!
//! tsconfig files are JSONC: comments and trailing commas are allowed. This
//! crate parses them into a `serde_json::Value` for reading and comparison,
//! and renders edits back either as minimal in-place text edits (keeping
//! every comment and untouched byte) or as plain pretty-printed JSON.

pub mod diff;
pub mod document;
pub mod error;
pub mod format;
pub mod rewrite;

pub use diff::{SemanticChange, SemanticDiff};
pub use document::JsoncDocument;
pub use error::{Error, Result};
pub use format::RenderOptions;
