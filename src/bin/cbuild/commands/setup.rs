//! `cbuild setup` command
//!
//! Same pipeline as a build, but packs are installed best-effort, the
//! per-context target is the compile database, and no summary is printed.

use anyhow::Result;

use cbuild::ops::cbuild_build;

use crate::cli::{BuildArgs, GlobalArgs};
use crate::commands::{prepare, start};

pub fn execute(global: &GlobalArgs, args: BuildArgs) -> Result<()> {
    let (input, mut options, config) = prepare(global, &args)?;
    options.setup = true;

    let gctx = start(global, &config)?;
    let result = cbuild_build(&gctx, &options, &input);
    gctx.close();

    result
}
