//! Package selection: allowlist, tsconfig presence, path filter

use std::collections::HashSet;

use tsrefs_fs::NormalizedPath;

use crate::package::Package;
use crate::plugin::PackageManagerPlugin;
use crate::{Error, Result, SyncOptions};

/// Decides which packages a run touches.
///
/// Checks run in a fixed order: allowlist, then tsconfig presence, then the
/// path filter. Rejections are not errors.
#[derive(Debug)]
pub struct PackageFilter<'a> {
    options: &'a SyncOptions,
    allowed: Option<HashSet<String>>,
}

impl<'a> PackageFilter<'a> {
    /// Build the filter for `packages`.
    ///
    /// With an allowlist, the admitted set is every listed package plus its
    /// direct dependencies that are workspace members. The expansion is one
    /// level deep: dependencies of dependencies are not added.
    pub fn new(
        options: &'a SyncOptions,
        plugin: &dyn PackageManagerPlugin,
        packages: &[Package],
    ) -> Result<Self> {
        if options.only_packages().is_empty() {
            return Ok(Self {
                options,
                allowed: None,
            });
        }

        let members: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let mut allowed = HashSet::new();
        for name in options.only_packages() {
            let package = packages
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| Error::UnknownPackage { name: name.clone() })?;

            allowed.insert(name.clone());
            allowed.extend(
                plugin
                    .get_dependencies(&package.manifest)
                    .into_iter()
                    .filter(|dep| members.contains(dep.as_str())),
            );
        }

        tracing::debug!(count = allowed.len(), "expanded package allowlist");
        Ok(Self {
            options,
            allowed: Some(allowed),
        })
    }

    /// The tsconfig to process for `package`, or `None` to skip it.
    pub fn select(&self, package: &Package) -> Option<NormalizedPath> {
        if let Some(allowed) = &self.allowed
            && !allowed.contains(&package.name)
        {
            tracing::debug!(package = %package.name, "skipping: not in package allowlist");
            return None;
        }

        let tsconfig = self.options.tsconfig_for(&package.location);
        if !tsconfig.is_file() {
            tracing::debug!(package = %package.name, path = %tsconfig, "skipping: no tsconfig");
            return None;
        }

        if let Some(only_on_path) = self.options.only_on_path()
            && !package.location.is_child_of(only_on_path)
        {
            tracing::debug!(package = %package.name, filter = %only_on_path, "skipping: outside path filter");
            return None;
        }

        Some(tsconfig)
    }
}
