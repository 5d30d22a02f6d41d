//! Check-mode comparison
//!
//! Compares the tsconfig as found on disk with the tsconfig the mutator
//! would write. Comments never differ (no mutation touches them), so the
//! comparison is on JSON values: object key order is ignored, array order
//! is not.

use std::fmt;

use tsrefs_content::{JsoncDocument, SemanticChange};

/// A package whose tsconfig is out of date.
#[derive(Debug, Clone, PartialEq)]
pub struct TsconfigMismatch {
    /// Package name
    pub package: String,
    /// tsconfig path relative to the monorepo root
    pub file: String,
    /// What a sync would change
    pub changes: Vec<SemanticChange>,
}

impl fmt::Display for TsconfigMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} is out of date:", self.package, self.file)?;
        for change in &self.changes {
            write!(f, "\n    {change}")?;
        }
        Ok(())
    }
}

/// Compare a mutated document against its parsed original.
pub fn compare(package: &str, file: &str, document: &JsoncDocument) -> Option<TsconfigMismatch> {
    let diff = document.diff();
    if diff.is_equivalent {
        return None;
    }
    Some(TsconfigMismatch {
        package: package.to_string(),
        file: file.to_string(),
        changes: diff.changes,
    })
}
