//! npm / yarn / bun workspaces: the `workspaces` field of the root manifest

use tsrefs_fs::NormalizedPath;

use super::{PackageIndex, PackageManagerPlugin};
use crate::package::{PACKAGE_JSON, Package, PackageJson};
use crate::{Error, Result};

pub const NAME: &str = "workspaces";

/// Workspace globs declared in the root `package.json`, if any.
pub(crate) fn workspace_patterns(root: &NormalizedPath) -> Result<Option<Vec<String>>> {
    let path = root.join(PACKAGE_JSON);
    if !path.is_file() {
        return Ok(None);
    }
    let manifest = PackageJson::load(&path)?;
    Ok(manifest.workspaces.map(|w| w.patterns().to_vec()))
}

#[derive(Debug)]
pub struct WorkspacesPlugin {
    index: PackageIndex,
}

impl WorkspacesPlugin {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            index: PackageIndex::new(root),
        }
    }

    fn patterns(&self) -> Result<Vec<String>> {
        workspace_patterns(self.index.root())?.ok_or_else(|| Error::InvalidConfig {
            message: format!("{} has no workspaces field", self.index.root().join(PACKAGE_JSON)),
        })
    }
}

impl PackageManagerPlugin for WorkspacesPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self) -> bool {
        matches!(workspace_patterns(self.index.root()), Ok(Some(_)))
    }

    fn get_all_packages(&self) -> Result<Vec<Package>> {
        Ok(self.index.load(|| self.patterns())?.to_vec())
    }

    fn resolve(&self, name: &str) -> Option<NormalizedPath> {
        self.index.locate(name, || self.patterns())
    }
}
