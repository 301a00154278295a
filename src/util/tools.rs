//! External tool discovery.
//!
//! Lookup order per tool: explicit path from the `[tools]` config section,
//! the directory of the running executable (tools installed side by side),
//! then `PATH`.

use std::collections::HashMap;
use std::env::consts::EXE_SUFFIX;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::errors::CbuildError;
use crate::util::config::ToolsConfig;
use crate::util::process::find_executable;

/// The external programs cbuild drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Project-model converter.
    Csolution,
    /// Pack installer.
    Cpackget,
    /// Legacy build-file generator.
    Cbuildgen,
    /// Build index to CMake tree generator.
    Cbuild2cmake,
    Cmake,
    Ninja,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Csolution,
        Tool::Cpackget,
        Tool::Cbuildgen,
        Tool::Cbuild2cmake,
        Tool::Cmake,
        Tool::Ninja,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Csolution => "csolution",
            Tool::Cpackget => "cpackget",
            Tool::Cbuildgen => "cbuildgen",
            Tool::Cbuild2cmake => "cbuild2cmake",
            Tool::Cmake => "cmake",
            Tool::Ninja => "ninja",
        }
    }

    fn configured<'a>(&self, config: &'a ToolsConfig) -> Option<&'a PathBuf> {
        match self {
            Tool::Csolution => config.csolution.as_ref(),
            Tool::Cpackget => config.cpackget.as_ref(),
            Tool::Cbuildgen => config.cbuildgen.as_ref(),
            Tool::Cbuild2cmake => config.cbuild2cmake.as_ref(),
            Tool::Cmake => config.cmake.as_ref(),
            Tool::Ninja => config.ninja.as_ref(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    paths: HashMap<Tool, PathBuf>,
}

impl ToolPaths {
    /// Locate every tool.
    pub fn discover(config: &ToolsConfig) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));

        let mut paths = HashMap::new();
        for tool in Tool::ALL {
            let found = tool
                .configured(config)
                .cloned()
                .or_else(|| {
                    exe_dir
                        .as_ref()
                        .map(|dir| dir.join(format!("{}{}", tool.name(), EXE_SUFFIX)))
                        .filter(|p| p.is_file())
                })
                .or_else(|| find_executable(tool.name()));

            match found {
                Some(path) => {
                    tracing::debug!("{} -> {}", tool, path.display());
                    paths.insert(tool, path);
                }
                None => tracing::debug!("{} not found", tool),
            }
        }

        ToolPaths { paths }
    }

    /// Every tool mapped to its bare name, resolved by the OS at spawn time.
    pub fn bare() -> Self {
        ToolPaths {
            paths: Tool::ALL
                .iter()
                .map(|t| (*t, PathBuf::from(t.name())))
                .collect(),
        }
    }

    /// Override one tool's location.
    pub fn with(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(tool, path.into());
        self
    }

    /// Location of `tool`, if known.
    pub fn find(&self, tool: Tool) -> Option<&Path> {
        self.paths.get(&tool).map(PathBuf::as_path)
    }

    /// Location of `tool`, or `ToolNotFound`.
    pub fn get(&self, tool: Tool) -> Result<&Path, CbuildError> {
        self.find(tool).ok_or_else(|| CbuildError::ToolNotFound {
            tool: tool.name().to_string(),
        })
    }
}
