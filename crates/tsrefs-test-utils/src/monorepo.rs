//! [`TestMonorepo`] builder for tsrefs test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// A temporary monorepo with helpers for laying out packages and checking
/// the files a run leaves behind.
///
/// # Example
///
/// ```rust,no_run
/// use tsrefs_test_utils::TestMonorepo;
///
/// let repo = TestMonorepo::workspaces(&["packages/*"]);
/// repo.add_package("packages/core", "core", &[], &[]);
/// repo.add_package("packages/app", "app", &["core"], &[]);
/// repo.write("packages/app/tsconfig.json", "{}");
/// ```
pub struct TestMonorepo {
    temp_dir: TempDir,
}

impl Default for TestMonorepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMonorepo {
    /// Empty temporary directory, no package manager markers.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// npm/yarn style root: `package.json` with a `workspaces` array.
    pub fn workspaces(patterns: &[&str]) -> Self {
        let repo = Self::new();
        repo.write_json(
            "package.json",
            &json!({"name": "monorepo", "private": true, "workspaces": patterns}),
        );
        repo
    }

    /// pnpm root: `pnpm-workspace.yaml` listing `patterns`.
    pub fn pnpm(patterns: &[&str]) -> Self {
        let repo = Self::new();
        let mut yaml = String::from("packages:\n");
        for pattern in patterns {
            yaml.push_str(&format!("  - '{pattern}'\n"));
        }
        repo.write("pnpm-workspace.yaml", &yaml);
        repo.write_json("package.json", &json!({"name": "monorepo", "private": true}));
        repo
    }

    /// lerna root: `lerna.json` listing `patterns`.
    pub fn lerna(patterns: &[&str]) -> Self {
        let repo = Self::new();
        repo.write_json("lerna.json", &json!({"version": "0.0.0", "packages": patterns}));
        repo.write_json("package.json", &json!({"name": "monorepo", "private": true}));
        repo
    }

    /// `packages/core` (no deps) and `packages/app` (depends on core), both
    /// with an empty `{}` tsconfig.
    pub fn core_and_app() -> Self {
        let repo = Self::workspaces(&["packages/*"]);
        repo.add_package("packages/core", "core", &[], &[]);
        repo.add_package("packages/app", "app", &["core"], &[]);
        repo.write("packages/core/tsconfig.json", "{}");
        repo.write("packages/app/tsconfig.json", "{}");
        repo
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `path` (relative to the root).
    pub fn path(&self, path: &str) -> PathBuf {
        self.root().join(path)
    }

    /// Write `dir/package.json` with the given dependency names, all `"*"`.
    pub fn add_package(&self, dir: &str, name: &str, dependencies: &[&str], dev_dependencies: &[&str]) {
        let section = |names: &[&str]| {
            names
                .iter()
                .map(|n| ((*n).to_string(), Value::String("*".into())))
                .collect::<Map<String, Value>>()
        };

        let mut manifest = Map::new();
        manifest.insert("name".into(), Value::String(name.into()));
        manifest.insert("version".into(), Value::String("1.0.0".into()));
        if !dependencies.is_empty() {
            manifest.insert("dependencies".into(), Value::Object(section(dependencies)));
        }
        if !dev_dependencies.is_empty() {
            manifest.insert("devDependencies".into(), Value::Object(section(dev_dependencies)));
        }
        self.write_json(&format!("{dir}/package.json"), &Value::Object(manifest));
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    pub fn write_json(&self, path: &str, value: &Value) {
        self.write(path, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn read(&self, path: &str) -> String {
        let full_path = self.path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Parse `path` as plain JSON.
    pub fn read_json(&self, path: &str) -> Value {
        serde_json::from_str(&self.read(path))
            .unwrap_or_else(|e| panic!("{path} is not plain JSON: {e}"))
    }

    /// # Panics
    /// Panics if `path` (relative to root) does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(full_path.exists(), "Expected file to exist: {}", full_path.display());
    }

    /// # Panics
    /// Panics if `path` (relative to root) exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }

    /// Snapshot of every file under the root, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
            let mut entries: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
            entries.sort();
            for path in entries {
                if path.is_dir() {
                    walk(&path, out);
                } else {
                    let content = fs::read_to_string(&path).unwrap_or_default();
                    out.push((path, content));
                }
            }
        }

        let mut files = Vec::new();
        walk(self.root(), &mut files);
        files
    }
}
