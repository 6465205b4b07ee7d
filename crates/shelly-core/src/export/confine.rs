//! Confinement of export paths to the configured output directory
//!
//! A requested path is accepted only if it stays inside the root twice over:
//! lexically, after folding `.` and `..`, and physically, after the
//! filesystem has followed every symlink. Symlinks are allowed as long as
//! their target is inside the root.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Why a requested export path was refused
#[derive(Debug, Error)]
pub enum PathError {
    #[error("export path is empty")]
    Empty,

    #[error("export path contains a NUL byte")]
    InvalidCharacter,

    #[error("absolute export paths are not allowed")]
    Absolute,

    #[error("export path escapes the output directory")]
    Escapes,

    #[error("export artifact not found: {0}")]
    NotFound(String),

    #[error("export output directory {path} is unavailable: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export output directory {0} is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("IO error resolving export path: {0}")]
    Io(#[from] std::io::Error),
}

impl PathError {
    /// True for requests that tried to leave the output directory
    pub fn is_escape(&self) -> bool {
        matches!(self, PathError::Absolute | PathError::Escapes)
    }
}

/// Canonicalised export output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRoot {
    root: PathBuf,
}

impl ExportRoot {
    /// Open the output directory, creating it first when `create` is set
    pub fn open(dir: impl AsRef<Path>, create: bool) -> Result<Self, PathError> {
        let dir = dir.as_ref();
        let unavailable = |source: std::io::Error| PathError::RootUnavailable {
            path: dir.to_path_buf(),
            source,
        };

        if create {
            fs::create_dir_all(dir).map_err(unavailable)?;
        }
        let root = dir.canonicalize().map_err(unavailable)?;
        if !root.is_dir() {
            return Err(PathError::RootNotDirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an existing artifact for download
    ///
    /// Returns the canonical path, guaranteed to be inside the root.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, PathError> {
        let relative = normalize(requested)?;
        let candidate = self.root.join(&relative);
        let canonical = candidate.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => PathError::NotFound(relative.display().to_string()),
            _ => PathError::Io(e),
        })?;
        if !canonical.starts_with(&self.root) {
            return Err(PathError::Escapes);
        }
        Ok(canonical)
    }

    /// Resolve where a new artifact may be written
    ///
    /// The parent directory must already exist inside the root. If the
    /// target exists as a symlink, its destination must be inside the root.
    pub fn resolve_for_write(&self, requested: &str) -> Result<PathBuf, PathError> {
        let relative = normalize(requested)?;
        let file_name = relative.file_name().ok_or(PathError::Empty)?;
        let parent_rel = relative.parent().unwrap_or_else(|| Path::new(""));

        let parent = self.root.join(parent_rel).canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => PathError::NotFound(parent_rel.display().to_string()),
            _ => PathError::Io(e),
        })?;
        if !parent.starts_with(&self.root) {
            return Err(PathError::Escapes);
        }

        let target = parent.join(file_name);
        if let Ok(meta) = fs::symlink_metadata(&target) {
            if meta.file_type().is_symlink() {
                // Dangling links cannot be proven safe
                let real = target.canonicalize().map_err(|_| PathError::Escapes)?;
                if !real.starts_with(&self.root) {
                    return Err(PathError::Escapes);
                }
            }
        }
        Ok(target)
    }
}

/// Fold `.` and `..` without touching the filesystem
///
/// Rejects absolute paths and any `..` that would climb above the root.
fn normalize(requested: &str) -> Result<PathBuf, PathError> {
    if requested.is_empty() {
        return Err(PathError::Empty);
    }
    if requested.contains('\0') {
        return Err(PathError::InvalidCharacter);
    }

    let mut parts: Vec<&OsStr> = Vec::new();
    for component in Path::new(requested).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return Err(PathError::Absolute),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(PathError::Escapes);
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }
    if parts.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(parts.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, ExportRoot) {
        let dir = tempdir().unwrap();
        let exports = dir.path().join("exports");
        fs::create_dir_all(exports.join("2024")).unwrap();
        fs::write(exports.join("devices.json"), "{}").unwrap();
        fs::write(exports.join("2024/backup.json"), "{}").unwrap();
        fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
        let root = ExportRoot::open(&exports, false).unwrap();
        (dir, root)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a/b.json").unwrap(), PathBuf::from("a/b.json"));
        assert_eq!(normalize("./a/./b.json").unwrap(), PathBuf::from("a/b.json"));
        assert_eq!(normalize("a/../b.json").unwrap(), PathBuf::from("b.json"));
        assert!(matches!(normalize("../b.json"), Err(PathError::Escapes)));
        assert!(matches!(normalize("a/../../b.json"), Err(PathError::Escapes)));
        assert!(matches!(normalize("/etc/passwd"), Err(PathError::Absolute)));
        assert!(matches!(normalize(""), Err(PathError::Empty)));
        assert!(matches!(normalize("."), Err(PathError::Empty)));
        assert!(matches!(normalize("a\0b"), Err(PathError::InvalidCharacter)));
    }

    #[test]
    fn test_resolve_inside_root() {
        let (_dir, root) = setup();
        let path = root.resolve("devices.json").unwrap();
        assert!(path.starts_with(root.root()));
        assert!(path.ends_with("devices.json"));

        let nested = root.resolve("2024/../2024/backup.json").unwrap();
        assert!(nested.ends_with("2024/backup.json"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, root) = setup();
        let err = root.resolve("../secret.txt").unwrap_err();
        assert!(err.is_escape());
        assert!(root.resolve("/etc/passwd").unwrap_err().is_escape());
    }

    #[test]
    fn test_resolve_missing() {
        let (_dir, root) = setup();
        assert!(matches!(root.resolve("nope.json"), Err(PathError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let (dir, root) = setup();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.root().join("leak.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path(), root.root().join("up")).unwrap();

        assert!(matches!(root.resolve("leak.txt"), Err(PathError::Escapes)));
        assert!(matches!(root.resolve("up/secret.txt"), Err(PathError::Escapes)));
        assert!(matches!(root.resolve_for_write("leak.txt"), Err(PathError::Escapes)));
        assert!(matches!(root.resolve_for_write("up/new.json"), Err(PathError::Escapes)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_allowed() {
        let (_dir, root) = setup();
        std::os::unix::fs::symlink(root.root().join("2024/backup.json"), root.root().join("latest.json"))
            .unwrap();
        let resolved = root.resolve("latest.json").unwrap();
        assert!(resolved.ends_with("2024/backup.json"));
    }

    #[test]
    fn test_resolve_for_write() {
        let (_dir, root) = setup();
        let target = root.resolve_for_write("2024/new.json").unwrap();
        assert_eq!(target, root.root().join("2024").join("new.json"));

        assert!(matches!(root.resolve_for_write("missing-dir/new.json"), Err(PathError::NotFound(_))));
        assert!(root.resolve_for_write("../new.json").unwrap_err().is_escape());
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let wanted = dir.path().join("a/b/exports");
        assert!(matches!(
            ExportRoot::open(&wanted, false),
            Err(PathError::RootUnavailable { .. })
        ));
        let root = ExportRoot::open(&wanted, true).unwrap();
        assert!(root.root().is_dir());
    }

    #[test]
    fn test_open_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(matches!(ExportRoot::open(&file, false), Err(PathError::RootNotDirectory(_))));
    }
}
