//! Package manager plugins
//!
//! A plugin answers four questions about a monorepo: does it manage this
//! root, which packages exist, which dependency names of a package should
//! become references, and where does a package name live on disk.
//!
//! Built-in backends cover npm/yarn/bun workspaces, pnpm and lerna. Other
//! layouts are described by a custom plugin manifest (see [`custom`]).

pub mod custom;
pub mod globs;
pub mod lerna;
pub mod pnpm;
pub mod workspaces;

use tsrefs_fs::NormalizedPath;

use crate::package::{DependencyField, Package, PackageJson};
use crate::{Error, Result};

pub use custom::{CustomPlugin, CustomPluginFactory, CustomPluginManifest};
pub use globs::{PackageIndex, discover_packages};
pub use lerna::LernaPlugin;
pub use pnpm::PnpmPlugin;
pub use workspaces::WorkspacesPlugin;

/// Contract every workspace backend implements.
pub trait PackageManagerPlugin {
    /// Identifier used in logs and error messages
    fn name(&self) -> &str;

    /// True if this backend manages the monorepo at its root.
    fn supports(&self) -> bool;

    /// Every workspace package, in a stable order.
    fn get_all_packages(&self) -> Result<Vec<Package>>;

    /// Dependency names of `manifest` that may turn into references.
    fn get_dependencies(&self, manifest: &PackageJson) -> Vec<String> {
        manifest.dependency_names(&DependencyField::DEFAULT)
    }

    /// Absolute location of the workspace package `name`, or `None` for
    /// packages outside the monorepo.
    fn resolve(&self, name: &str) -> Option<NormalizedPath>;
}

/// Construction-time inputs shared by all plugins.
#[derive(Debug, Clone)]
pub struct PluginContext {
    pub root: NormalizedPath,
}

/// Builds a plugin for a given monorepo.
pub trait PluginFactory {
    fn name(&self) -> &str;

    fn create(&self, context: &PluginContext) -> Box<dyn PackageManagerPlugin>;
}

struct BuiltinFactory {
    name: &'static str,
    create: fn(&PluginContext) -> Box<dyn PackageManagerPlugin>,
}

impl PluginFactory for BuiltinFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn create(&self, context: &PluginContext) -> Box<dyn PackageManagerPlugin> {
        (self.create)(context)
    }
}

/// Names of the built-in plugins, in default priority order.
pub const BUILTIN_PLUGINS: [&str; 3] = [workspaces::NAME, pnpm::NAME, lerna::NAME];

fn workspaces_plugin(context: &PluginContext) -> Box<dyn PackageManagerPlugin> {
    Box::new(WorkspacesPlugin::new(context.root.clone()))
}

fn pnpm_plugin(context: &PluginContext) -> Box<dyn PackageManagerPlugin> {
    Box::new(PnpmPlugin::new(context.root.clone()))
}

fn lerna_plugin(context: &PluginContext) -> Box<dyn PackageManagerPlugin> {
    Box::new(LernaPlugin::new(context.root.clone()))
}

fn builtin(name: &str) -> Option<Box<dyn PluginFactory>> {
    let create: fn(&PluginContext) -> Box<dyn PackageManagerPlugin> = match name {
        workspaces::NAME => workspaces_plugin,
        pnpm::NAME => pnpm_plugin,
        lerna::NAME => lerna_plugin,
        _ => return None,
    };
    let name = BUILTIN_PLUGINS.into_iter().find(|builtin| *builtin == name)?;
    Some(Box::new(BuiltinFactory { name, create }))
}

/// Ordered list of plugin factories; the first supporting plugin wins.
pub struct PluginRegistry {
    factories: Vec<Box<dyn PluginFactory>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PluginRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Built-in backends in default priority order: workspaces, pnpm, lerna.
    pub fn builtin() -> Self {
        let factories = BUILTIN_PLUGINS.into_iter().filter_map(builtin).collect();
        Self { factories }
    }

    /// Registry for a list of plugin specs, or the built-ins when empty.
    ///
    /// Each spec is a built-in name or a path (relative to `base_dir`) to a
    /// custom plugin manifest. Any bad spec fails the whole call.
    pub fn from_specs(specs: &[String], base_dir: &NormalizedPath) -> Result<Self> {
        if specs.is_empty() {
            return Ok(Self::builtin());
        }
        let mut registry = Self::new();
        for spec in specs {
            registry.push(Self::load(spec, base_dir)?);
        }
        Ok(registry)
    }

    /// Resolve one plugin spec into a factory.
    pub fn load(spec: &str, base_dir: &NormalizedPath) -> Result<Box<dyn PluginFactory>> {
        if let Some(factory) = builtin(spec) {
            return Ok(factory);
        }

        let path = base_dir.resolve(spec);
        if !path.is_file() {
            return Err(Error::PluginNotFound {
                spec: spec.to_string(),
            });
        }
        Ok(Box::new(CustomPluginFactory::load(spec, &path)?))
    }

    pub fn push(&mut self, factory: Box<dyn PluginFactory>) {
        self.factories.push(factory);
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    /// Create one plugin per factory, preserving order.
    pub fn instantiate(&self, context: &PluginContext) -> Vec<Box<dyn PackageManagerPlugin>> {
        self.factories.iter().map(|f| f.create(context)).collect()
    }
}

/// The first plugin whose `supports()` is true.
pub fn select_plugin(
    plugins: &[Box<dyn PackageManagerPlugin>],
) -> Option<&dyn PackageManagerPlugin> {
    plugins
        .iter()
        .map(|plugin| plugin.as_ref())
        .find(|plugin| plugin.supports())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        name: &'static str,
        supported: bool,
    }

    impl PackageManagerPlugin for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn supports(&self) -> bool {
            self.supported
        }
        fn get_all_packages(&self) -> Result<Vec<Package>> {
            Ok(Vec::new())
        }
        fn resolve(&self, _name: &str) -> Option<NormalizedPath> {
            None
        }
    }

    #[test]
    fn test_first_supporting_plugin_wins() {
        let plugins: Vec<Box<dyn PackageManagerPlugin>> = vec![
            Box::new(Fixed { name: "a", supported: false }),
            Box::new(Fixed { name: "b", supported: true }),
            Box::new(Fixed { name: "c", supported: true }),
        ];
        assert_eq!(select_plugin(&plugins).map(|p| p.name()), Some("b"));
    }

    #[test]
    fn test_no_supporting_plugin() {
        let plugins: Vec<Box<dyn PackageManagerPlugin>> =
            vec![Box::new(Fixed { name: "a", supported: false })];
        assert!(select_plugin(&plugins).is_none());
    }

    #[test]
    fn test_builtin_order() {
        assert_eq!(PluginRegistry::builtin().names(), vec!["workspaces", "pnpm", "lerna"]);
    }

    #[test]
    fn test_from_specs_builtin_names() {
        let registry =
            PluginRegistry::from_specs(&["lerna".to_string()], &NormalizedPath::new("/")).unwrap();
        assert_eq!(registry.names(), vec!["lerna"]);
    }

    #[test]
    fn test_unknown_spec_is_not_found() {
        let err = PluginRegistry::load("./does-not-exist.toml", &NormalizedPath::new("/nonexistent"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::PluginNotFound { spec } if spec == "./does-not-exist.toml"));
    }
}
