//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// All package locations, tsconfig paths and generated reference paths go
/// through this type, so `references[].path` values look the same on every
/// platform. Conversion to the native form happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Resolve `path` against this directory.
    ///
    /// Absolute inputs are returned as-is (cleaned); relative inputs are
    /// joined onto `self` and cleaned.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Self {
        let candidate = Self::new(path);
        if candidate.is_absolute() {
            candidate.clean()
        } else {
            self.join(candidate.as_str()).clean()
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// True for `/...` paths and drive-prefixed Windows paths (`C:/...`).
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || has_drive_prefix(&self.inner)
    }

    /// Lexically resolve `.` and `..` segments and collapse repeated slashes.
    ///
    /// Does not touch the filesystem, so symlinks are not followed. A `..`
    /// that would climb above an absolute root is dropped.
    pub fn clean(&self) -> Self {
        let (prefix, rest) = split_prefix(&self.inner);
        let mut segments: Vec<&str> = Vec::new();

        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.last().is_some_and(|last| *last != "..") {
                        segments.pop();
                    } else if prefix.is_empty() {
                        segments.push("..");
                    }
                }
                other => segments.push(other),
            }
        }

        let joined = segments.join("/");
        let inner = if !prefix.is_empty() {
            format!("{prefix}{joined}")
        } else if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        };
        Self { inner }
    }

    /// Path of `self` relative to `base`, always with forward slashes.
    ///
    /// Returns `None` when no relative form exists (for example when one
    /// side is absolute and the other is not). Equal paths yield `"."`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        let relative = pathdiff::diff_paths(self.clean().to_native(), base.clean().to_native())?;
        let relative = Self::new(relative);
        if relative.inner.is_empty() {
            Some(Self {
                inner: ".".to_string(),
            })
        } else {
            Some(relative)
        }
    }

    /// True if `self` lies strictly below `ancestor`.
    ///
    /// Matching is by whole path segments: `/repo/packages-old` is not a
    /// child of `/repo/packages`, and no path is a child of itself.
    pub fn is_child_of(&self, ancestor: &NormalizedPath) -> bool {
        if self.is_absolute() != ancestor.is_absolute() {
            return false;
        }

        let child = self.clean();
        let parent = ancestor.clean();
        let child_segments = segments(&child.inner);
        let parent_segments = segments(&parent.inner);

        child_segments.len() > parent_segments.len()
            && child_segments.starts_with(&parent_segments)
    }

    /// Resolve symlinks and return the canonical absolute path.
    ///
    /// Uses `dunce` so Windows paths come back without the `\\?\` prefix.
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.to_native();
        dunce::canonicalize(&native)
            .map(Self::new)
            .map_err(|e| Error::io(native, e))
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn split_prefix(path: &str) -> (&str, &str) {
    if path.starts_with('/') {
        (&path[..1], &path[1..])
    } else if has_drive_prefix(path) && path[2..].starts_with('/') {
        (&path[..3], &path[3..])
    } else if has_drive_prefix(path) {
        (&path[..2], &path[2..])
    } else {
        ("", path)
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
