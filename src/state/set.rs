//! Pinned context set (`<solution>.cbuild-set.yml`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CbuildSetFile {
    #[serde(rename = "cbuild-set")]
    pub build_set: BuildSet,
}

/// A previously pinned selection plus the toolchain it was pinned with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSet {
    pub generated_by: String,
    pub contexts: Vec<SetEntry>,
    pub compiler: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetEntry {
    pub context: String,
}

impl BuildSet {
    /// Pinned context names, in file order.
    pub fn contexts(&self) -> Vec<String> {
        self.contexts.iter().map(|e| e.context.clone()).collect()
    }
}
