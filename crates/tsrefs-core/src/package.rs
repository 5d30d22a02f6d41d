//! Workspace packages and their `package.json` manifests

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tsrefs_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// Manifest file name inside every package directory.
pub const PACKAGE_JSON: &str = "package.json";

/// A dependency section of `package.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyField {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
}

impl DependencyField {
    /// Sections that produce project references unless a plugin says otherwise.
    pub const DEFAULT: [DependencyField; 2] =
        [DependencyField::Dependencies, DependencyField::DevDependencies];
}

/// The `workspaces` field of a root `package.json`.
///
/// npm and bun use a plain list; yarn classic also accepts an object with a
/// `packages` list (and `nohoist`, which is irrelevant here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    List(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::List(patterns) => patterns,
            Self::Object { packages } => packages,
        }
    }
}

/// The subset of `package.json` that drives reference synchronization.
///
/// Dependency maps keep declaration order so emitted references follow the
/// order a developer wrote them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub optional_dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Workspaces>,
}

impl PackageJson {
    /// Read and parse a `package.json`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(path, &content)
    }

    /// Parse `package.json` text; `path` is only used for error messages.
    pub fn parse(path: &NormalizedPath, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::InvalidManifest {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    pub fn section(&self, field: DependencyField) -> &IndexMap<String, String> {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::PeerDependencies => &self.peer_dependencies,
            DependencyField::OptionalDependencies => &self.optional_dependencies,
        }
    }

    /// Dependency names across `fields`, in field order then declaration
    /// order. A name listed in several sections appears once.
    pub fn dependency_names(&self, fields: &[DependencyField]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for field in fields {
            for name in self.section(*field).keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

/// A workspace member: a directory holding a named `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Absolute directory of the package
    pub location: NormalizedPath,
    pub manifest: PackageJson,
}

impl Package {
    /// Load the package in `location`.
    ///
    /// Returns `Ok(None)` when the manifest has no `name`: such directories
    /// are not addressable workspace members.
    pub fn load(location: NormalizedPath) -> Result<Option<Self>> {
        let manifest = PackageJson::load(&location.join(PACKAGE_JSON))?;
        let Some(name) = manifest.name.clone() else {
            return Ok(None);
        };
        Ok(Some(Self {
            name,
            location,
            manifest,
        }))
    }

    /// Location relative to `root`, for messages. Falls back to the absolute
    /// location when no relative form exists.
    pub fn display_path(&self, root: &NormalizedPath) -> String {
        self.location
            .relative_to(root)
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| self.location.as_str().to_string())
    }
}
