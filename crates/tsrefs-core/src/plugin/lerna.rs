//! lerna: `packages` in `lerna.json`, or the npm workspaces when
//! `useWorkspaces` is set

use serde::Deserialize;
use tsrefs_fs::{ConfigStore, NormalizedPath};

use super::workspaces::workspace_patterns;
use super::{PackageIndex, PackageManagerPlugin};
use crate::package::Package;
use crate::{Error, Result};

pub const NAME: &str = "lerna";

pub const LERNA_JSON: &str = "lerna.json";

fn default_packages() -> Vec<String> {
    vec!["packages/*".to_string()]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LernaConfig {
    #[serde(default = "default_packages")]
    packages: Vec<String>,
    #[serde(default)]
    use_workspaces: bool,
}

#[derive(Debug)]
pub struct LernaPlugin {
    index: PackageIndex,
}

impl LernaPlugin {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            index: PackageIndex::new(root),
        }
    }

    fn config_file(&self) -> NormalizedPath {
        self.index.root().join(LERNA_JSON)
    }

    fn patterns(&self) -> Result<Vec<String>> {
        let config: LernaConfig = ConfigStore::new().load(&self.config_file())?;
        if !config.use_workspaces {
            return Ok(config.packages);
        }
        workspace_patterns(self.index.root())?.ok_or_else(|| Error::InvalidConfig {
            message: format!(
                "{} sets useWorkspaces but package.json has no workspaces field",
                self.config_file()
            ),
        })
    }
}

impl PackageManagerPlugin for LernaPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn supports(&self) -> bool {
        self.config_file().is_file()
    }

    fn get_all_packages(&self) -> Result<Vec<Package>> {
        Ok(self.index.load(|| self.patterns())?.to_vec())
    }

    fn resolve(&self, name: &str) -> Option<NormalizedPath> {
        self.index.locate(name, || self.patterns())
    }
}
