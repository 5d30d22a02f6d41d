//! pnpm: `packages` in `pnpm-workspace.yaml`

use serde::Deserialize;
use tsrefs_fs::{ConfigStore, NormalizedPath};

use super::{PackageIndex, PackageManagerPlugin};
use crate::Result;
use crate::package::Package;

pub const NAME: &str = "pnpm";

pub const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";

#[derive(Debug, Default, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

#[derive(Debug)]
pub struct PnpmPlugin {
    index: PackageIndex,
}

impl PnpmPlugin {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            index: PackageIndex::new(root),
        }
    }

    fn workspace_file(&self) -> NormalizedPath {
        self.index.root().join(PNPM_WORKSPACE)
    }

    fn patterns(&self) -> Result<Vec<String>> {
        let workspace: PnpmWorkspace = ConfigStore::new().load(&self.workspace_file())?;
        Ok(workspace.packages)
    }
}

impl PackageManagerPlugin for PnpmPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self) -> bool {
        self.workspace_file().is_file()
    }

    fn get_all_packages(&self) -> Result<Vec<Package>> {
        Ok(self.index.load(|| self.patterns())?.to_vec())
    }

    fn resolve(&self, name: &str) -> Option<NormalizedPath> {
        self.index.locate(name, || self.patterns())
    }
}
