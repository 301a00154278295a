//! `cbuild list` command

use std::path::Path;

use anyhow::Result;

use cbuild::core::options::Options;
use cbuild::ops::list;

use crate::cli::{GlobalArgs, ListArgs, ListCommands};
use crate::commands::{config_for, start};

pub fn execute(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let dir = match args.command {
        ListCommands::Contexts { ref solution, .. }
        | ListCommands::TargetSets { ref solution }
        | ListCommands::Configurations { ref solution, .. } => solution.parent(),
        ListCommands::Toolchains { ref solution } => solution.as_deref().and_then(Path::parent),
        ListCommands::Environment => None,
    }
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or_else(|| Path::new("."))
    .to_path_buf();

    let gctx = start(global, &config_for(&dir))?;

    let result = match args.command {
        ListCommands::Contexts { solution, filter } => {
            list::list_contexts(&gctx, &solution, filter.as_deref())
        }
        ListCommands::Toolchains { solution } => {
            list::list_toolchains(&gctx, solution.as_deref(), global.verbose)
        }
        ListCommands::TargetSets { solution } => list::list_target_sets(&gctx, &solution),
        ListCommands::Environment => {
            for line in list::environment(&gctx).lines() {
                println!("{}", line);
            }
            Ok(())
        }
        ListCommands::Configurations { solution, output } => {
            let options = Options {
                output,
                ..Options::default()
            };
            list::list_configurations(&options, &solution).map(|configurations| {
                for configuration in configurations {
                    println!("{}", configuration);
                }
            })
        }
    };

    gctx.close();
    result
}
