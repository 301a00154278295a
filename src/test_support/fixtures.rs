//! Test fixtures for common test scenarios.
//!
//! Writers for the YAML files the converter produces, and canned tool
//! outputs for the scripted runner.

use std::path::{Path, PathBuf};

use crate::core::context::parse_context;
use crate::state::cbuild::{CbuildBuild, CbuildFile, OutputDirs};
use crate::state::index::{BuildIndex, CbuildIndexFile, CbuildRecord};
use crate::state::set::{BuildSet, CbuildSetFile, SetEntry};

/// File name used for fixture indexes.
pub const INDEX_FILE: &str = "Solution.cbuild-idx.yml";

/// File name used for fixture context sets.
pub const SET_FILE: &str = "Solution.cbuild-set.yml";

/// An index with one record per context, each pointing at
/// `<context>.cbuild.yml` next to the index.
pub fn index_with_contexts(contexts: &[&str]) -> BuildIndex {
    let cbuilds = contexts
        .iter()
        .map(|ctx| {
            let item = parse_context(ctx).expect("fixture context must parse");
            CbuildRecord {
                cbuild: format!("{}.cbuild.yml", ctx),
                project: item.project_name.clone(),
                configuration: ctx[item.project_name.len()..].to_string(),
                ..CbuildRecord::default()
            }
        })
        .collect();

    BuildIndex {
        generated_by: "csolution version 2.6.0".to_string(),
        cbuilds,
        ..BuildIndex::default()
    }
}

/// Write `index` to `<dir>/Solution.cbuild-idx.yml`.
pub fn write_index(dir: &Path, index: &BuildIndex) -> PathBuf {
    let path = dir.join(INDEX_FILE);
    let file = CbuildIndexFile {
        build_idx: index.clone(),
    };
    write_yaml(&path, &file);
    path
}

/// Write a context set listing `contexts` to `<dir>/Solution.cbuild-set.yml`.
pub fn write_set(dir: &Path, contexts: &[&str]) -> PathBuf {
    let path = dir.join(SET_FILE);
    let file = CbuildSetFile {
        build_set: BuildSet {
            generated_by: "csolution version 2.6.0".to_string(),
            contexts: contexts
                .iter()
                .map(|c| SetEntry {
                    context: c.to_string(),
                })
                .collect(),
            compiler: None,
        },
    };
    write_yaml(&path, &file);
    path
}

/// Write a per-context cbuild file, optionally declaring an outdir.
pub fn write_cbuild(path: &Path, outdir: Option<&str>) {
    let context = path
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(".cbuild.yml").to_string())
        .unwrap_or_default();
    let file = CbuildFile {
        build: CbuildBuild {
            generated_by: "csolution version 2.6.0".to_string(),
            context,
            compiler: Some("AC6".to_string()),
            output_dirs: OutputDirs {
                intdir: None,
                outdir: outdir.map(String::from),
            },
        },
    };
    write_yaml(path, &file);
}

/// Write a `CMakeCache.txt` into `tmp_dir` recording `cache_dir` as the
/// directory it was created in.
pub fn write_cmake_cache(tmp_dir: &Path, cache_dir: &Path) -> PathBuf {
    let path = tmp_dir.join("CMakeCache.txt");
    let contents = format!(
        "# This is the CMakeCache file.\n\
         CMAKE_BUILD_TYPE:STRING=\n\
         CMAKE_CACHEFILE_DIR:INTERNAL={}\n\
         CMAKE_GENERATOR:INTERNAL=Ninja\n",
        cache_dir.display()
    );
    create_parent(&path);
    std::fs::write(&path, contents).expect("failed to write CMakeCache.txt fixture");
    path
}

fn write_yaml<T: serde::Serialize>(path: &Path, value: &T) {
    let yaml = serde_yaml::to_string(value).expect("fixture must serialize");
    create_parent(path);
    std::fs::write(path, yaml).expect("failed to write fixture");
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create fixture directory");
    }
}

/// Canned outputs of the external tools.
pub mod tool_outputs {
    use super::super::MockProcessOutput;

    /// `csolution list contexts` / `list packs` style output: one item per line.
    pub fn lines(items: &[&str]) -> MockProcessOutput {
        let mut stdout = items.join("\n");
        if !stdout.is_empty() {
            stdout.push('\n');
        }
        MockProcessOutput::success(stdout)
    }

    /// Converter exit 2 in setup mode, caused by unresolved layer variables.
    pub fn convert_undefined_layers() -> MockProcessOutput {
        MockProcessOutput::failure(
            2,
            "error csolution: undefined variables in Solution.csolution.yml:\n  - $Board-Layer$\n",
        )
    }

    /// `csolution list layers --update-idx` output naming compatible layers.
    pub fn list_layers_hint() -> MockProcessOutput {
        MockProcessOutput::with_output(
            0,
            "",
            "warning csolution: undefined variables in Solution.csolution.yml:\n  - $Board-Layer$\n\
             info csolution: valid configuration #1: (context 'App.Debug+CM0')\n",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_index_with_contexts_splits_names() {
        let idx = index_with_contexts(&["App.Debug+CM0", "Boot+CM4"]);
        assert_eq!(idx.cbuilds[0].project, "App");
        assert_eq!(idx.cbuilds[0].configuration, ".Debug+CM0");
        assert_eq!(idx.cbuilds[1].configuration, "+CM4");
        assert_eq!(idx.contexts(), vec!["App.Debug+CM0", "Boot+CM4"]);
    }

    #[test]
    fn test_written_index_parses_back() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &index_with_contexts(&["App.Debug+CM0"]));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("build-idx:"));
        assert!(contents.contains("cbuild: App.Debug+CM0.cbuild.yml"));
    }

    #[test]
    fn test_write_cmake_cache() {
        let tmp = TempDir::new().unwrap();
        let path = write_cmake_cache(&tmp.path().join("tmp"), Path::new("/work/tmp"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("CMAKE_CACHEFILE_DIR:INTERNAL=/work/tmp\n"));
    }

    #[test]
    fn test_lines_output() {
        assert_eq!(tool_outputs::lines(&["a", "b"]).stdout, "a\nb\n");
        assert_eq!(tool_outputs::lines(&[]).stdout, "");
    }
}
