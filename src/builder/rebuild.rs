//! Automatic rebuild detection for the index backend.
//!
//! A full rebuild is forced when the solution tree was moved since CMake
//! last configured the temp directory (the cache records absolute paths),
//! or when the converter flagged the index or any context for rebuild.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::cbuild_idx::resolve_tmp_dir;
use crate::core::options::Options;
use crate::state::index::DEFAULT_TMP_DIR;
use crate::state::parse_cbuild_index_file;
use crate::util::fs::{absolutize, paths_equal, remove_dir_all_if_exists};

/// CMake cache file name inside the temp directory.
pub const CMAKE_CACHE_FILE: &str = "CMakeCache.txt";

const CACHEFILE_DIR_PREFIX: &str = "CMAKE_CACHEFILE_DIR:INTERNAL=";

/// Whether the index backend must clean before building.
///
/// Always `false` for an explicit `--rebuild` (the caller cleans anyway)
/// and for the legacy backend. Errors reading the index propagate.
pub fn need_rebuild(options: &Options, index_path: &Path, cwd: &Path) -> Result<bool> {
    if options.rebuild || options.is_legacy() {
        return Ok(false);
    }

    let tmp_dir = resolve_tmp_dir(options, index_path).unwrap_or_else(|e| {
        tracing::debug!("cannot resolve temp dir ({:#}), assuming default", e);
        index_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_TMP_DIR)
    });

    if project_moved(&tmp_dir, cwd) {
        tracing::info!("project location changed since last build, rebuilding");
        return Ok(true);
    }

    let index = parse_cbuild_index_file(index_path)?;
    if index.rebuild_requested() {
        tracing::info!("build index requests a rebuild");
        return Ok(true);
    }
    Ok(false)
}

/// Whether the CMake cache in `tmp_dir` was written for another location.
///
/// No cache means nothing to compare against. A cache that cannot be read,
/// or one without a cache-dir entry, counts as moved.
pub fn project_moved(tmp_dir: &Path, cwd: &Path) -> bool {
    let expected = absolutize(cwd, tmp_dir);
    let cache = expected.join(CMAKE_CACHE_FILE);
    if !cache.exists() {
        return false;
    }

    let recorded = match read_cache_dir(&cache) {
        Ok(Some(dir)) => dir,
        Ok(None) => {
            tracing::debug!("{} has no {} entry", cache.display(), CACHEFILE_DIR_PREFIX);
            return true;
        }
        Err(e) => {
            tracing::debug!("cannot read {}: {}", cache.display(), e);
            return true;
        }
    };

    let recorded = absolutize(cwd, &recorded);
    let moved = !paths_equal(&expected, &recorded);
    if moved {
        tracing::debug!(
            "cache dir {} does not match {}",
            recorded.display(),
            expected.display()
        );
    }
    moved
}

/// Drop the top-level CMake cache of the temp directory so the next
/// configure starts from scratch. Per-context trees are left to
/// [`Builder::clean`](crate::builder::Builder::clean).
pub fn remove_cmake_cache(tmp_dir: &Path) -> Result<()> {
    let cache = tmp_dir.join(CMAKE_CACHE_FILE);
    if cache.exists() {
        std::fs::remove_file(&cache)
            .with_context(|| format!("failed to remove {}", cache.display()))?;
    }
    remove_dir_all_if_exists(&tmp_dir.join("CMakeFiles"))
}

fn read_cache_dir(cache: &Path) -> std::io::Result<Option<PathBuf>> {
    let reader = BufReader::new(File::open(cache)?);
    for line in reader.lines() {
        let line = line?;
        if let Some(dir) = line.strip_prefix(CACHEFILE_DIR_PREFIX) {
            return Ok(Some(PathBuf::from(dir.trim())));
        }
    }
    Ok(None)
}
