//! `cbuild <input>` command

use anyhow::Result;

use cbuild::ops::cbuild_build;

use crate::cli::{BuildArgs, GlobalArgs};
use crate::commands::{prepare, start};

pub fn execute(global: &GlobalArgs, args: BuildArgs) -> Result<()> {
    let (input, options, config) = prepare(global, &args)?;

    let gctx = start(global, &config)?;
    let result = cbuild_build(&gctx, &options, &input);
    gctx.close();

    result
}
