//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use cbuild::core::options::{Backend, Options};
use cbuild::util::shell::ColorChoice;

/// cbuild - build orchestrator for csolution projects
#[derive(Parser)]
#[command(name = "cbuild")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Switches accepted by every command.
#[derive(Args)]
pub struct GlobalArgs {
    /// Suppress everything but errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output, passed on to the external tools
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Colour status output: auto, always or never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate build files and the compile database for an IDE
    Setup(BuildArgs),

    /// Query information about a solution or the installation
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Which contexts to operate on.
#[derive(Args, Default)]
pub struct SelectionArgs {
    /// Context filter `[project][.build][+target]`, wildcards allowed
    #[arg(short = 'c', long = "context", value_name = "FILTER")]
    pub contexts: Vec<String>,

    /// Use the contexts pinned in the context-set file
    #[arg(short = 'S', long)]
    pub context_set: bool,

    /// Select the active target set `<target-type>[@<set>]`
    #[arg(short, long, value_name = "TARGET")]
    pub active: Option<String>,
}

#[derive(Args, Default)]
pub struct BuildArgs {
    /// Solution (*.csolution.yml) or legacy project (*.cprj)
    #[arg(required = true, value_name = "INPUT")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output directory for the generated build files
    #[arg(short = 'O', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Intermediate directory
    #[arg(long, value_name = "DIR")]
    pub intdir: Option<PathBuf>,

    /// Output directory for the legacy backend
    #[arg(long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Remove intermediate and output directories
    #[arg(short = 'C', long)]
    pub clean: bool,

    /// Clean, then build
    #[arg(short, long, conflicts_with = "clean")]
    pub rebuild: bool,

    /// Download and install missing packs
    #[arg(short, long)]
    pub packs: bool,

    /// Build only this CMake target
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Select the toolchain
    #[arg(short, long)]
    pub toolchain: Option<String>,

    /// CMake generator
    #[arg(short, long)]
    pub generator: Option<String>,

    /// Build with the legacy cbuildgen backend
    #[arg(long)]
    pub cbuildgen: bool,

    /// Pack loading policy: latest, all or required
    #[arg(short, long)]
    pub load: Option<String>,

    /// Skip schema validation of the input files
    #[arg(long)]
    pub no_schema_check: bool,

    /// Do not allow pack versions to change
    #[arg(long)]
    pub frozen_packs: bool,

    /// Do not update the RTE directory
    #[arg(long)]
    pub no_update_rte: bool,
}

impl BuildArgs {
    /// Options as given on the command line.
    pub fn to_options(&self, global: &GlobalArgs) -> Options {
        Options {
            contexts: self.selection.contexts.clone(),
            use_context_set: self.selection.context_set,
            active_target_set: self.selection.active.clone(),
            output: self.output.clone(),
            int_dir: self.intdir.clone(),
            out_dir: self.outdir.clone(),
            jobs: self.jobs,
            quiet: global.quiet,
            debug: global.debug,
            verbose: global.verbose,
            clean: self.clean,
            rebuild: self.rebuild,
            packs: self.packs,
            schema_check: !self.no_schema_check,
            frozen_packs: self.frozen_packs,
            update_rte: !self.no_update_rte,
            backend: if self.cbuildgen {
                Backend::Cbuildgen
            } else {
                Backend::CbuildIndex
            },
            toolchain: self.toolchain.clone(),
            generator: self.generator.clone(),
            target: self.target.clone(),
            load: self.load.clone(),
            setup: false,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommands,
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Contexts of a solution
    Contexts {
        solution: PathBuf,

        /// Only contexts matching this pattern
        #[arg(long)]
        filter: Option<String>,
    },

    /// Toolchains installed, or required by a solution
    Toolchains { solution: Option<PathBuf> },

    /// Target sets of a solution
    TargetSets { solution: PathBuf },

    /// External tools and environment variables cbuild uses
    Environment,

    /// Build configurations recorded in the build index
    Configurations {
        solution: PathBuf,

        /// Output directory the build files were generated into
        #[arg(short = 'O', long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: CompletionShell,
}
