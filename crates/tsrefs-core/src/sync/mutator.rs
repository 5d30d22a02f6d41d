//! Structural tsconfig edits

use serde_json::Value;
use tsrefs_content::JsoncDocument;
use tsrefs_fs::NormalizedPath;

use super::references::ProjectReference;
use crate::package::Package;
use crate::{Error, Result, SyncOptions};

/// Applies the enabled edits to one tsconfig document.
///
/// Edits run in a fixed order: composite, rootDir, extends, include,
/// references. Only `references` is unconditional.
#[derive(Debug, Clone, Copy)]
pub struct TsconfigMutator<'a> {
    options: &'a SyncOptions,
}

impl<'a> TsconfigMutator<'a> {
    pub fn new(options: &'a SyncOptions) -> Self {
        Self { options }
    }

    /// Mutate `document`, the parsed tsconfig at `tsconfig` for `package`.
    pub fn apply(
        &self,
        package: &Package,
        tsconfig: &NormalizedPath,
        document: &mut JsoncDocument,
        references: &[ProjectReference],
    ) -> Result<()> {
        let set = |document: &mut JsoncDocument, path: &[&str], value: Value| {
            document
                .set(path, value)
                .map_err(|e| Error::invalid_tsconfig(tsconfig.to_native(), e))
        };

        if self.options.add_composite() {
            set(document, &["compilerOptions", "composite"], Value::Bool(true))?;
        }

        if let Some(root_dir) = self.options.add_root_dir() {
            set(
                document,
                &["compilerOptions", "rootDir"],
                Value::String(root_dir.to_string()),
            )?;
        }

        if let Some(target) = self.options.add_extends() {
            let relative = target
                .relative_to(&package.location)
                .ok_or_else(|| Error::unrelatable_path(target, &package.location))?;
            set(document, &["extends"], Value::String(relative.as_str().to_string()))?;
        }

        if !self.options.add_include().is_empty() {
            let include = self.merged_include(tsconfig, document)?;
            set(document, &["include"], include)?;
        }

        if references.is_empty() && document.get(&["references"]).is_none() {
            return Ok(());
        }
        set(document, &["references"], ProjectReference::to_array(references))
    }

    /// Existing `include` entries followed by configured patterns not yet present.
    fn merged_include(&self, tsconfig: &NormalizedPath, document: &JsoncDocument) -> Result<Value> {
        let mut include = match document.get(&["include"]) {
            None => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(Error::invalid_tsconfig(
                    tsconfig.to_native(),
                    "\"include\" must be an array",
                ));
            }
        };

        for pattern in self.options.add_include() {
            let pattern = Value::String(pattern.clone());
            if !include.contains(&pattern) {
                include.push(pattern);
            }
        }
        Ok(Value::Array(include))
    }
}
