//! Semantic diff between two JSON values

use std::fmt;

use serde_json::Value;

/// Maximum recursion depth for diff operations
const MAX_DIFF_DEPTH: usize = 128;

/// Result of comparing two documents semantically
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticDiff {
    /// Are the documents semantically equivalent?
    pub is_equivalent: bool,
    /// List of semantic changes
    pub changes: Vec<SemanticChange>,
}

impl SemanticDiff {
    /// Compute a semantic diff between two JSON values
    ///
    /// Object key order is ignored, array order is not. Changes carry
    /// their path, e.g. `compilerOptions.composite` or `references[1].path`.
    pub fn compute(old: &Value, new: &Value) -> Self {
        let mut changes = Vec::new();
        diff_values(old, new, String::new(), &mut changes, 0);

        Self {
            is_equivalent: changes.is_empty(),
            changes,
        }
    }
}

/// A semantic change between documents
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticChange {
    /// Key/path added
    Added { path: String, value: Value },
    /// Key/path removed
    Removed { path: String, value: Value },
    /// Value changed at path
    Modified { path: String, old: Value, new: Value },
}

impl SemanticChange {
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => {
                path
            }
        }
    }
}

impl fmt::Display for SemanticChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, value } => write!(f, "+ {path} = {value}"),
            Self::Removed { path, value } => write!(f, "- {path} = {value}"),
            Self::Modified { path, old, new } => write!(f, "~ {path}: {old} -> {new}"),
        }
    }
}

fn child_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn diff_values(
    old: &Value,
    new: &Value,
    path: String,
    changes: &mut Vec<SemanticChange>,
    depth: usize,
) {
    // Past the limit, report the whole subtree as one modification
    if depth > MAX_DIFF_DEPTH {
        if old != new {
            changes.push(SemanticChange::Modified {
                path,
                old: old.clone(),
                new: new.clone(),
            });
        }
        return;
    }

    match (old, new) {
        (Value::Object(old_obj), Value::Object(new_obj)) => {
            for (key, old_value) in old_obj {
                let child_path = child_key(&path, key);
                match new_obj.get(key) {
                    Some(new_value) => {
                        diff_values(old_value, new_value, child_path, changes, depth + 1)
                    }
                    None => changes.push(SemanticChange::Removed {
                        path: child_path,
                        value: old_value.clone(),
                    }),
                }
            }

            for (key, new_value) in new_obj {
                if !old_obj.contains_key(key) {
                    changes.push(SemanticChange::Added {
                        path: child_key(&path, key),
                        value: new_value.clone(),
                    });
                }
            }
        }

        (Value::Array(old_arr), Value::Array(new_arr)) => {
            let max_len = old_arr.len().max(new_arr.len());
            for i in 0..max_len {
                let child_path = format!("{path}[{i}]");
                match (old_arr.get(i), new_arr.get(i)) {
                    (Some(old_val), Some(new_val)) => {
                        diff_values(old_val, new_val, child_path, changes, depth + 1);
                    }
                    (Some(old_val), None) => changes.push(SemanticChange::Removed {
                        path: child_path,
                        value: old_val.clone(),
                    }),
                    (None, Some(new_val)) => changes.push(SemanticChange::Added {
                        path: child_path,
                        value: new_val.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }

        _ => {
            if old != new {
                changes.push(SemanticChange::Modified {
                    path,
                    old: old.clone(),
                    new: new.clone(),
                });
            }
        }
    }
}
