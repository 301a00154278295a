//! `cbuild list ...` subcommands.
//!
//! Most of them are answered by the converter itself and only forwarded;
//! `environment` and `configurations` are answered locally.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::options::Options;
use crate::state::{parse_cbuild_index_file, SolutionFiles};
use crate::util::context::GlobalContext;
use crate::util::process::Stdio;
use crate::util::tools::Tool;

/// Environment variable naming the pack root.
pub const PACK_ROOT_VAR: &str = "CMSIS_PACK_ROOT";

/// Environment variable naming the compiler registration directory.
pub const COMPILER_ROOT_VAR: &str = "CMSIS_COMPILER_ROOT";

/// `csolution list contexts <sln> [--filter <f>]`
pub fn list_contexts(gctx: &GlobalContext, solution: &Path, filter: Option<&str>) -> Result<()> {
    let mut cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "contexts"])
        .arg(solution);
    if let Some(filter) = filter {
        cmd = cmd.arg("--filter").arg(filter);
    }
    gctx.run_checked(&cmd, Stdio::Inherit)?;
    Ok(())
}

/// `csolution list toolchains [<sln>] [-v]`
pub fn list_toolchains(gctx: &GlobalContext, solution: Option<&Path>, verbose: bool) -> Result<()> {
    let cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "toolchains"])
        .args(solution)
        .arg_if(verbose, "-v");
    gctx.run_checked(&cmd, Stdio::Inherit)?;
    Ok(())
}

/// `csolution list target-sets <sln>`
pub fn list_target_sets(gctx: &GlobalContext, solution: &Path) -> Result<()> {
    let cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "target-sets"])
        .arg(solution);
    gctx.run_checked(&cmd, Stdio::Inherit)?;
    Ok(())
}

/// Unique `.build+target` suffixes recorded in the build index, file order.
pub fn list_configurations(options: &Options, solution: &Path) -> Result<Vec<String>> {
    let files = SolutionFiles::new(solution, options.output.as_deref());
    let index = parse_cbuild_index_file(&files.index)?;

    let mut configurations: Vec<String> = Vec::new();
    for record in &index.cbuilds {
        if !configurations.contains(&record.configuration) {
            configurations.push(record.configuration.clone());
        }
    }
    Ok(configurations)
}

/// One external tool as seen from this installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub tool: Tool,
    pub path: Option<PathBuf>,
    /// First line of `<tool> --version`, when it ran.
    pub version: Option<String>,
}

/// Everything `list environment` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub tools: Vec<ToolInfo>,
    pub pack_root: Option<String>,
    pub compiler_root: Option<String>,
}

impl Environment {
    /// Report lines, one per tool then one per variable.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .tools
            .iter()
            .map(|info| match (&info.path, &info.version) {
                (Some(path), Some(version)) => {
                    format!("{:<13}{} ({})", info.tool.name(), path.display(), version)
                }
                (Some(path), None) => format!("{:<13}{}", info.tool.name(), path.display()),
                (None, _) => format!("{:<13}<not found>", info.tool.name()),
            })
            .collect();

        lines.push(format!(
            "{}={}",
            PACK_ROOT_VAR,
            self.pack_root.as_deref().unwrap_or("")
        ));
        lines.push(format!(
            "{}={}",
            COMPILER_ROOT_VAR,
            self.compiler_root.as_deref().unwrap_or("")
        ));
        lines
    }
}

/// Probe every tool and read the pack/compiler root variables.
pub fn environment(gctx: &GlobalContext) -> Environment {
    let tools = Tool::ALL
        .iter()
        .map(|&tool| {
            let path = gctx.tools().find(tool).map(Path::to_path_buf);
            let version = path.as_ref().and_then(|_| tool_version(gctx, tool));
            ToolInfo {
                tool,
                path,
                version,
            }
        })
        .collect();

    Environment {
        tools,
        pack_root: std::env::var(PACK_ROOT_VAR).ok(),
        compiler_root: std::env::var(COMPILER_ROOT_VAR).ok(),
    }
}

fn tool_version(gctx: &GlobalContext, tool: Tool) -> Option<String> {
    let cmd = gctx.tool(tool).ok()?.arg("--version");
    let output = match gctx.run(&cmd, Stdio::Capture) {
        Ok(output) if output.success() => output,
        Ok(output) => {
            tracing::debug!("{} --version exited with {:?}", tool, output.code);
            return None;
        }
        Err(e) => {
            tracing::debug!("{} --version: {:#}", tool, e);
            return None;
        }
    };
    let version = output.stdout_lines().next().map(String::from);
    version
}
