//! Command implementations

pub mod build;
pub mod completions;
pub mod list;
pub mod setup;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use cbuild::core::options::Options;
use cbuild::util::config::{global_config_path, load_config, project_config_path, Config};
use cbuild::util::shell::Shell;
use cbuild::util::tools::ToolPaths;
use cbuild::util::GlobalContext;

use crate::cli::{BuildArgs, GlobalArgs};

/// Configuration for a run rooted at `dir` (global + project).
pub fn config_for(dir: &Path) -> Config {
    load_config(global_config_path().as_deref(), &project_config_path(dir))
}

/// Start a run: shell from the global switches, tools from the config.
pub fn start(global: &GlobalArgs, config: &Config) -> Result<GlobalContext> {
    let shell = Shell::from_flags(global.quiet, global.verbose, global.color);
    let tools = ToolPaths::discover(&config.tools);
    GlobalContext::init(shell, tools)
}

/// Input path and options for a build-like command, config defaults applied.
pub fn prepare(global: &GlobalArgs, args: &BuildArgs) -> Result<(PathBuf, Options, Config)> {
    let input = args.input.clone().context("no input file given")?;
    let dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let config = config_for(dir);
    let mut options = args.to_options(global);
    config.apply_defaults(&mut options, args.cbuildgen);
    tracing::debug!("options: {:?}", options);

    Ok((input, options, config))
}
