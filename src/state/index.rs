//! Build index (`<solution>.cbuild-idx.yml`).
//!
//! Written by the converter on every successful conversion; cbuild only
//! reads it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default temp directory name when the index does not declare one.
pub const DEFAULT_TMP_DIR: &str = "tmp";

/// Top-level document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CbuildIndexFile {
    #[serde(rename = "build-idx")]
    pub build_idx: BuildIndex,
}

/// Index-level fields plus one record per context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildIndex {
    /// Converter version stamp.
    pub generated_by: String,

    /// Solution file, relative to the index.
    pub csolution: Option<String>,

    /// Temp directory, relative to the index.
    pub tmpdir: Option<String>,

    pub cbuilds: Vec<CbuildRecord>,

    /// Global "rebuild required" flag.
    pub rebuild: bool,

    pub image_only: bool,

    pub executes: Vec<ExecuteStep>,
}

/// One context's entry in the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CbuildRecord {
    /// Per-context metadata file, relative to the index. The legacy project
    /// file sits next to it.
    pub cbuild: String,

    pub project: String,

    /// `.build+target` suffix.
    pub configuration: String,

    /// Context is built by an external build tool (west).
    pub west: bool,

    pub rebuild: bool,

    pub messages: Messages,
}

/// Diagnostics recorded by the last conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

/// A post-build step declared in the solution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExecuteStep {
    pub execute: String,
    pub run: Option<String>,
    pub always: bool,
}

impl CbuildRecord {
    /// Full context name: project followed by configuration.
    pub fn context(&self) -> String {
        format!("{}{}", self.project, self.configuration)
    }
}

impl BuildIndex {
    /// Context names of every record, in file order.
    pub fn contexts(&self) -> Vec<String> {
        self.cbuilds.iter().map(CbuildRecord::context).collect()
    }

    /// Record for an exact context name.
    pub fn record(&self, context: &str) -> Option<&CbuildRecord> {
        self.cbuilds.iter().find(|r| r.context() == context)
    }

    /// Absolute temp directory for an index located at `index_path`.
    pub fn tmp_dir(&self, index_path: &Path) -> PathBuf {
        let base = index_path.parent().unwrap_or_else(|| Path::new("."));
        base.join(self.tmpdir.as_deref().unwrap_or(DEFAULT_TMP_DIR))
    }

    /// Whether the converter asked for a rebuild, globally or for any context.
    pub fn rebuild_requested(&self) -> bool {
        self.rebuild || self.cbuilds.iter().any(|r| r.rebuild)
    }

    /// Warnings across all records, first occurrence only.
    pub fn unique_warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = Vec::new();
        for warning in self.cbuilds.iter().flat_map(|r| &r.messages.warnings) {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }
        warnings
    }
}
