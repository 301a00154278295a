//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Path for display: relative to `base` when it lives below it.
pub fn display_path(base: &Path, path: &Path) -> String {
    if path.starts_with(base) {
        relative_path(base, path).display().to_string()
    } else {
        path.display().to_string()
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Does not touch the filesystem, so it works for paths that do not exist.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Absolute, lexically clean form of `path`, resolved against `base`.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean_path(path)
    } else {
        clean_path(&base.join(path))
    }
}

/// Compare two paths the way the host filesystem does.
///
/// Windows and macOS filesystems are case-insensitive by default.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let a = clean_path(a);
    let b = clean_path(b);
    if cfg!(any(windows, target_os = "macos")) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("a/b/../../..")), PathBuf::from(".."));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("a//b/")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize(Path::new("/work"), Path::new("out/../tmp")),
            PathBuf::from("/work/tmp")
        );
        assert_eq!(
            absolutize(Path::new("/work"), Path::new("/other/./x")),
            PathBuf::from("/other/x")
        );
    }

    #[test]
    fn test_paths_equal_ignores_lexical_noise() {
        assert!(paths_equal(Path::new("/a/b/../c"), Path::new("/a/c/")));
        assert!(!paths_equal(Path::new("/a/c"), Path::new("/a/d")));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_paths_equal_case_sensitive_on_linux() {
        assert!(!paths_equal(Path::new("/A/b"), Path::new("/a/b")));
    }

    #[test]
    fn test_display_path() {
        let base = Path::new("/work");
        assert_eq!(display_path(base, Path::new("/work/out/app")), "out/app");
        assert_eq!(display_path(base, Path::new("/elsewhere")), "/elsewhere");
    }

    #[test]
    fn test_read_and_remove() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("nested/dir/file.txt");
        ensure_dir(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "hello").unwrap();
        assert_eq!(read_to_string(&file).unwrap(), "hello");

        remove_dir_all_if_exists(&tmp.path().join("nested")).unwrap();
        assert!(!file.exists());
        // second removal is a no-op
        remove_dir_all_if_exists(&tmp.path().join("nested")).unwrap();
    }
}
