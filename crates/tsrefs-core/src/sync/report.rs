//! Run result aggregation

use serde::{Deserialize, Serialize};

/// Outcome of a synchronization run that did not abort.
///
/// `errors` holds one message per package whose tsconfig is out of date
/// (check mode only), in processing order. `actions` lists files written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether every processed package was in sync (or written)
    pub success: bool,
    /// Actions taken during the run
    pub actions: Vec<String>,
    /// Recoverable failures collected during the run
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful report
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a failed report
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            actions: Vec::new(),
            errors,
        }
    }

    /// Success if `errors` is empty, failure otherwise.
    pub fn aggregate(actions: Vec<String>, errors: Vec<String>) -> Self {
        let report = if errors.is_empty() {
            Self::success()
        } else {
            Self::failure(errors)
        };
        Self { actions, ..report }
    }
}
