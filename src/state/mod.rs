//! Persisted build state.
//!
//! The converter leaves three kinds of YAML files behind: the build index,
//! the pinned context set, and one metadata file per context. This module
//! loads them and answers the questions the build pipeline asks.

pub mod cbuild;
pub mod index;
pub mod set;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::errors::CbuildError;
use crate::util::fs::read_to_string;

pub use cbuild::CbuildFile;
pub use index::{BuildIndex, CbuildRecord};
pub use set::BuildSet;

/// Solution file suffixes.
pub const SOLUTION_SUFFIXES: &[&str] = &[".csolution.yml", ".csolution.yaml"];

const INDEX_SUFFIX: &str = ".cbuild-idx.yml";
const SET_SUFFIX: &str = ".cbuild-set.yml";
const CBUILD_SUFFIX: &str = ".cbuild.yml";

/// Output directory name used when nothing else is declared.
pub const DEFAULT_OUT_DIR: &str = "out";

/// Paths of the state files belonging to one solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFiles {
    pub solution: PathBuf,
    pub index: PathBuf,
    pub set: PathBuf,
}

impl SolutionFiles {
    /// Derive the state file paths for `solution`.
    ///
    /// The index is written next to the solution unless the converter was
    /// given an output directory; the context set always sits next to the
    /// solution.
    pub fn new(solution: &Path, output: Option<&Path>) -> Self {
        let dir = solution.parent().unwrap_or_else(|| Path::new("."));
        let stem = solution_stem(solution);
        let index_dir = output.map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());

        SolutionFiles {
            solution: solution.to_path_buf(),
            index: index_dir.join(format!("{}{}", stem, INDEX_SUFFIX)),
            set: dir.join(format!("{}{}", stem, SET_SUFFIX)),
        }
    }
}

/// Whether `path` names a solution file.
pub fn is_solution_file(path: &Path) -> bool {
    let name = path.to_string_lossy();
    SOLUTION_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn solution_stem(solution: &Path) -> String {
    let name = solution
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    SOLUTION_SUFFIXES
        .iter()
        .find_map(|s| name.strip_suffix(s))
        .unwrap_or(&name)
        .to_string()
}

/// Load a build index.
pub fn parse_cbuild_index_file(path: &Path) -> Result<BuildIndex> {
    let contents = read_to_string(path)?;
    let file: index::CbuildIndexFile = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse build index: {}", path.display()))?;
    Ok(file.build_idx)
}

/// Load a pinned context set.
pub fn parse_cbuild_set_file(path: &Path) -> Result<BuildSet> {
    let contents = read_to_string(path)?;
    let file: set::CbuildSetFile = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse context set: {}", path.display()))?;
    Ok(file.build_set)
}

/// Load a per-context metadata file.
pub fn parse_cbuild_file(path: &Path) -> Result<CbuildFile> {
    let contents = read_to_string(path)?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse context metadata: {}", path.display()))
}

/// Contexts recorded in a state file.
///
/// With `use_context_set`, `path` is a context-set file and its pinned
/// contexts are returned; otherwise `path` is a build index and every
/// record's context is returned. File order is preserved either way.
pub fn get_selected_contexts(path: &Path, use_context_set: bool) -> Result<Vec<String>> {
    if use_context_set {
        Ok(parse_cbuild_set_file(path)?.contexts())
    } else {
        Ok(parse_cbuild_index_file(path)?.contexts())
    }
}

/// Output directory of `context`.
///
/// Falls back to `<index-dir>/out` when the index is absent, the context is
/// unknown, or its metadata declares no output directory. A relative output
/// directory is resolved against the metadata file's own directory.
pub fn get_out_dir(index_path: &Path, context: &str) -> Result<PathBuf> {
    let index_dir = index_path.parent().unwrap_or_else(|| Path::new("."));
    let default = index_dir.join(DEFAULT_OUT_DIR);

    if !index_path.exists() {
        return Ok(default);
    }

    let idx = parse_cbuild_index_file(index_path)?;
    let Some(record) = idx.record(context) else {
        tracing::debug!("context `{}` not in build index, using default output dir", context);
        return Ok(default);
    };

    let cbuild_path = index_dir.join(&record.cbuild);
    if !cbuild_path.exists() {
        tracing::debug!("{} missing, using default output dir", cbuild_path.display());
        return Ok(default);
    }
    let cbuild = parse_cbuild_file(&cbuild_path)?;

    match cbuild.build.output_dirs.outdir.filter(|d| !d.is_empty()) {
        Some(outdir) => {
            let outdir = PathBuf::from(outdir);
            if outdir.is_absolute() {
                Ok(outdir)
            } else {
                let cbuild_dir = cbuild_path.parent().unwrap_or(index_dir);
                Ok(cbuild_dir.join(outdir))
            }
        }
        None => Ok(default),
    }
}

/// Legacy project file (`.cprj`) for `context`.
///
/// The first record whose metadata path contains `context`
/// (case-insensitively) wins; the project file lives next to it.
pub fn get_cprj_file_path(index_path: &Path, context: &str) -> Result<PathBuf> {
    let idx = parse_cbuild_index_file(index_path)?;
    let needle = context.to_lowercase();
    let index_dir = index_path.parent().unwrap_or_else(|| Path::new("."));

    let record = idx
        .cbuilds
        .iter()
        .find(|r| r.cbuild.to_lowercase().contains(&needle))
        .ok_or_else(|| CbuildError::CprjNotFound {
            context: context.to_string(),
        })?;

    let cprj = match record.cbuild.strip_suffix(CBUILD_SUFFIX) {
        Some(stem) => format!("{}.cprj", stem),
        None => format!("{}.cprj", record.cbuild),
    };
    Ok(index_dir.join(cprj))
}
