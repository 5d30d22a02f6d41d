//! Generated ES-module tsconfig

use serde_json::{Map, Value};
use tsrefs_content::format::to_pretty;
use tsrefs_fs::{NormalizedPath, io};

use crate::options::EsmOptions;
use crate::package::Package;
use crate::{Result, SyncOptions};

/// Location of the ESM tsconfig for `package`.
pub fn esm_path(esm: &EsmOptions, package: &Package) -> NormalizedPath {
    package.location.join(&esm.file_name).clean()
}

/// Document extending the package tsconfig with ES-module output settings.
pub fn esm_document(options: &SyncOptions, esm: &EsmOptions, package: &Package) -> Value {
    let target = esm_path(esm, package);
    let tsconfig = options.tsconfig_for(&package.location).clean();
    let extends = target
        .parent()
        .and_then(|dir| tsconfig.relative_to(&dir))
        .map(|relative| dot_relative(relative.as_str()))
        .unwrap_or_else(|| dot_relative(options.tsconfig_path()));

    let mut compiler_options = Map::new();
    compiler_options.insert("module".into(), Value::String(esm.module.clone()));
    compiler_options.insert(
        "moduleResolution".into(),
        Value::String(esm.module_resolution.clone()),
    );
    compiler_options.insert("outDir".into(), Value::String(esm.out_dir.clone()));

    let mut document = Map::new();
    document.insert("extends".into(), Value::String(extends));
    document.insert("compilerOptions".into(), Value::Object(compiler_options));
    Value::Object(document)
}

fn dot_relative(path: &str) -> String {
    if path.starts_with("../") || path.starts_with("./") {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// Write the ESM tsconfig unless one already exists.
///
/// Returns the written path, or `None` when the file was left alone.
pub fn write_if_absent(
    options: &SyncOptions,
    esm: &EsmOptions,
    package: &Package,
) -> Result<Option<NormalizedPath>> {
    let path = esm_path(esm, package);
    if path.exists() {
        tracing::debug!(package = %package.name, %path, "ESM tsconfig already present");
        return Ok(None);
    }

    let content = to_pretty(&esm_document(options, esm, package), options.indentation())?;
    io::write_text(&path, &format!("{content}\n"))?;
    tracing::info!(package = %package.name, %path, "generated ESM tsconfig");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageJson;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn package(options: &SyncOptions) -> Package {
        let location = options.root().join("packages/a");
        std::fs::create_dir_all(location.to_native()).unwrap();
        Package {
            name: "a".into(),
            location,
            manifest: PackageJson::default(),
        }
    }

    #[test]
    fn test_default_document() {
        let dir = TempDir::new().unwrap();
        let options = SyncOptions::builder(dir.path()).build().unwrap();
        let package = package(&options);

        assert_eq!(
            esm_document(&options, &EsmOptions::default(), &package),
            json!({
                "extends": "./tsconfig.json",
                "compilerOptions": {
                    "module": "ESNext",
                    "moduleResolution": "node",
                    "outDir": "./module/"
                }
            })
        );
    }

    #[test]
    fn test_extends_follows_custom_tsconfig_path() {
        let dir = TempDir::new().unwrap();
        let options = SyncOptions::builder(dir.path())
            .tsconfig_path("tsconfig.build.json")
            .build()
            .unwrap();
        let package = package(&options);
        let document = esm_document(&options, &EsmOptions::default(), &package);
        assert_eq!(document["extends"], json!("./tsconfig.build.json"));
    }

    #[test]
    fn test_write_if_absent_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let options = SyncOptions::builder(dir.path()).build().unwrap();
        let package = package(&options);
        let esm = EsmOptions::default();

        let written = write_if_absent(&options, &esm, &package).unwrap().unwrap();
        let content = std::fs::read_to_string(written.to_native()).unwrap();
        assert!(content.starts_with("{\n  \"extends\": \"./tsconfig.json\""));
        assert!(content.ends_with("}\n"));

        std::fs::write(written.to_native(), "{}").unwrap();
        assert!(write_if_absent(&options, &esm, &package).unwrap().is_none());
        assert_eq!(std::fs::read_to_string(written.to_native()).unwrap(), "{}");
    }
}
