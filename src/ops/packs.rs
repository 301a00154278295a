//! Installation of packs a solution needs but the pack root lacks.

use std::path::Path;

use anyhow::Result;

use crate::core::options::Options;
use crate::util::context::GlobalContext;
use crate::util::process::{ProcessBuilder, Stdio};
use crate::util::shell::Status;
use crate::util::tools::Tool;

/// `csolution list packs <sln> -m [-c <ctx>]... [-l <load>]`
pub fn list_packs_command(
    gctx: &GlobalContext,
    options: &Options,
    solution: &Path,
) -> Result<ProcessBuilder> {
    let mut cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "packs"])
        .arg(solution)
        .arg("-m");
    for context in &options.contexts {
        cmd = cmd.arg("-c").arg(context);
    }
    if let Some(ref load) = options.load {
        cmd = cmd.arg("-l").arg(load);
    }
    Ok(cmd)
}

/// Pack ids the solution references that are not installed.
pub fn list_missing_packs(
    gctx: &GlobalContext,
    options: &Options,
    solution: &Path,
) -> Result<Vec<String>> {
    let cmd = list_packs_command(gctx, options, solution)?;
    let output = gctx.run_checked(&cmd, Stdio::Capture)?;
    if !output.stderr.is_empty() {
        tracing::debug!("{}", output.stderr.trim_end());
    }
    let missing = output.stdout_lines().map(String::from).collect();
    Ok(missing)
}

/// Install every missing pack, one `cpackget add` per pack.
///
/// Returns the number of packs installed.
pub fn install_missing_packs(
    gctx: &GlobalContext,
    options: &Options,
    solution: &Path,
) -> Result<usize> {
    let packs = list_missing_packs(gctx, options, solution)?;
    if packs.is_empty() {
        tracing::info!("all required packs are installed");
        return Ok(0);
    }

    for pack in &packs {
        gctx.shell().status(Status::Installing, pack);
        let cmd = gctx.tool(Tool::Cpackget)?.arg("add").arg(pack).arg("-a");
        gctx.run_checked(&cmd, Stdio::Inherit)?;
    }

    gctx.shell()
        .status(Status::Installed, format!("{} pack(s)", packs.len()));
    Ok(packs.len())
}
