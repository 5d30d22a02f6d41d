//! Workspace glob expansion shared by the built-in plugins

use std::cell::OnceCell;
use std::collections::HashSet;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use tsrefs_fs::NormalizedPath;

use crate::package::{PACKAGE_JSON, Package};
use crate::{Error, Result};

/// Expand workspace `patterns` under `root` into packages, sorted by location.
///
/// Patterns follow package-manager conventions: relative to the root, `*`
/// stays within one path segment, `**` crosses segments, and a leading `!`
/// excludes. `node_modules` and dot-directories are never searched. A
/// matched directory counts only if it holds a `package.json` with a name.
pub fn discover_packages(root: &NormalizedPath, patterns: &[String]) -> Result<Vec<Package>> {
    let (includes, excludes): (Vec<&str>, Vec<&str>) = patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .partition(|p| !p.starts_with('!'));
    let excludes: Vec<&str> = excludes.into_iter().map(|p| &p[1..]).collect();

    if includes.is_empty() {
        return Ok(Vec::new());
    }

    let include_set = build_set(&includes)?;
    let exclude_set = build_set(&excludes)?;
    let max_depth = max_depth(&includes);

    let root_native = root.to_native();
    let mut walker = WalkDir::new(&root_native).min_depth(1).follow_links(true);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut packages = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || (entry.file_type().is_dir() && !is_ignored_dir(entry))
        });
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable directory");
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(&root_native) else {
            continue;
        };
        let relative = NormalizedPath::new(relative);
        if !include_set.is_match(relative.as_str()) || exclude_set.is_match(relative.as_str()) {
            continue;
        }

        let location = NormalizedPath::new(entry.path());
        if !location.join(PACKAGE_JSON).is_file() {
            continue;
        }

        match Package::load(location)? {
            Some(package) => packages.push(package),
            None => tracing::warn!(path = %relative, "package.json has no name, skipping"),
        }
    }

    packages.sort_by(|a, b| a.location.cmp(&b.location));
    warn_duplicates(&packages);
    Ok(packages)
}

/// Strip the decorations package managers tolerate: `./` and trailing `/`.
fn clean_pattern(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}

fn build_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile(clean_pattern(pattern))?);
    }
    builder.build().map_err(|e| Error::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

fn compile(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Deepest directory level any pattern can match, or `None` with `**`.
fn max_depth(patterns: &[&str]) -> Option<usize> {
    let mut depth = 0;
    for pattern in patterns {
        let pattern = clean_pattern(pattern);
        if pattern.contains("**") {
            return None;
        }
        depth = depth.max(pattern.split('/').filter(|s| !s.is_empty()).count());
    }
    Some(depth)
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

fn warn_duplicates(packages: &[Package]) {
    let mut seen = HashSet::new();
    for package in packages {
        if !seen.insert(package.name.as_str()) {
            tracing::warn!(
                name = %package.name,
                location = %package.location,
                "duplicate package name; references resolve to the first location"
            );
        }
    }
}

/// Lazily discovered package list for one plugin instance.
///
/// Enumeration walks the filesystem, so it runs once and both
/// `get_all_packages` and `resolve` read the cached result.
#[derive(Debug)]
pub struct PackageIndex {
    root: NormalizedPath,
    packages: OnceCell<Vec<Package>>,
}

impl PackageIndex {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            packages: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Packages matching the patterns produced by `patterns`, discovering
    /// them on first use.
    pub fn load(&self, patterns: impl FnOnce() -> Result<Vec<String>>) -> Result<&[Package]> {
        if let Some(packages) = self.packages.get() {
            return Ok(packages);
        }
        let discovered = discover_packages(&self.root, &patterns()?)?;
        tracing::debug!(root = %self.root, count = discovered.len(), "discovered packages");
        Ok(self.packages.get_or_init(|| discovered))
    }

    /// Location of the first package named `name`.
    ///
    /// A discovery failure yields `None`. Runs enumerate through
    /// `get_all_packages` before resolving anything, so a discovery error
    /// aborts the run there and this only reads the cached list.
    pub fn locate(
        &self,
        name: &str,
        patterns: impl FnOnce() -> Result<Vec<String>>,
    ) -> Option<NormalizedPath> {
        let packages = match self.load(patterns) {
            Ok(packages) => packages,
            Err(e) => {
                tracing::warn!(root = %self.root, error = %e, name, "package discovery failed");
                return None;
            }
        };
        packages
            .iter()
            .find(|package| package.name == name)
            .map(|package| package.location.clone())
    }
}
