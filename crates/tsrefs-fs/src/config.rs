//! Format-agnostic configuration loading

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension. Used for the project config
/// file, custom plugin manifests and `pnpm-workspace.yaml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("");
        tracing::debug!(%path, extension, "loading config");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_error(path, "TOML", e)),
            "json" => serde_json::from_str(&content).map_err(|e| parse_error(path, "JSON", e)),
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(path, "YAML", e))
            }
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Load the first of `candidates` that exists, or `None` if none do.
    pub fn load_first<T: DeserializeOwned>(
        &self,
        candidates: &[NormalizedPath],
    ) -> Result<Option<(NormalizedPath, T)>> {
        for candidate in candidates {
            if candidate.is_file() {
                let value = self.load(candidate)?;
                return Ok(Some((candidate.clone(), value)));
            }
        }
        Ok(None)
    }
}

fn parse_error(path: &NormalizedPath, format: &str, error: impl std::fmt::Display) -> Error {
    Error::ConfigParse {
        path: path.to_native(),
        format: format.into(),
        message: error.to_string(),
    }
}
