//! Dependency edges to project references

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsrefs_fs::NormalizedPath;

use crate::package::Package;
use crate::plugin::PackageManagerPlugin;
use crate::{Error, Result};

/// One entry of a tsconfig `references` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    /// Path from the referencing package to the referenced package
    pub path: String,
}

impl ProjectReference {
    /// `references` array value for a list of references.
    pub fn to_array(references: &[ProjectReference]) -> Value {
        Value::Array(
            references
                .iter()
                .map(|reference| {
                    let mut entry = serde_json::Map::new();
                    entry.insert("path".to_string(), Value::String(reference.path.clone()));
                    Value::Object(entry)
                })
                .collect(),
        )
    }
}

/// Turns a package's dependency names into project references.
pub struct ReferenceResolver<'a> {
    plugin: &'a dyn PackageManagerPlugin,
    root: &'a NormalizedPath,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(plugin: &'a dyn PackageManagerPlugin, root: &'a NormalizedPath) -> Self {
        Self { plugin, root }
    }

    /// References for `package`, in dependency order.
    ///
    /// Dependencies outside the workspace are dropped. A relative resolved
    /// path or a package depending on itself aborts the run.
    pub fn references_for(&self, package: &Package) -> Result<Vec<ProjectReference>> {
        let mut references = Vec::new();
        for name in self.plugin.get_dependencies(&package.manifest) {
            if let Some(reference) = self.resolve_one(package, &name)? {
                references.push(reference);
            }
        }
        Ok(references)
    }

    fn resolve_one(&self, package: &Package, dependency: &str) -> Result<Option<ProjectReference>> {
        let Some(location) = self.plugin.resolve(dependency) else {
            tracing::trace!(package = %package.name, dependency, "external dependency");
            return Ok(None);
        };

        if !location.is_absolute() {
            return Err(Error::RelativeResolvedPath {
                plugin: self.plugin.name().to_string(),
                path: location.to_string(),
            });
        }

        if location.clean() == package.location.clean() {
            return Err(Error::SelfDependency {
                package: package.name.clone(),
                path: package.display_path(self.root),
            });
        }

        let relative = location
            .relative_to(&package.location)
            .ok_or_else(|| Error::unrelatable_path(&location, &package.location))?;

        Ok(Some(ProjectReference {
            path: relative.as_str().to_string(),
        }))
    }
}
