//! Build options.
//!
//! A flat record of every switch that influences a build. The CLI fills it,
//! the configuration file supplies defaults, and each per-context builder
//! owns its own copy.

use std::path::PathBuf;

use crate::core::errors::CbuildError;

/// Default CMake generator.
pub const DEFAULT_GENERATOR: &str = "Ninja";

/// Which backend builds a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Index/CMake-tree backend (`cbuild2cmake` + CMake).
    #[default]
    CbuildIndex,
    /// Legacy per-project backend (`cbuildgen` + `.cprj`).
    Cbuildgen,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cmake" | "cbuild2cmake" => Ok(Backend::CbuildIndex),
            "cbuildgen" | "legacy" => Ok(Backend::Cbuildgen),
            _ => Err(format!(
                "invalid backend '{}'; expected 'cmake' or 'cbuildgen'",
                s
            )),
        }
    }
}

/// Every switch that influences a build.
#[derive(Debug, Clone)]
pub struct Options {
    /// `--context` filters, in command-line order.
    pub contexts: Vec<String>,

    /// Reuse the pinned context set (`--context-set`).
    pub use_context_set: bool,

    /// Active target-set selector (`--active <type>[@set]`).
    pub active_target_set: Option<String>,

    /// Output directory override for the converter (`--output`).
    pub output: Option<PathBuf>,

    /// Intermediate directory override (`--intdir`).
    pub int_dir: Option<PathBuf>,

    /// Output directory override for the legacy backend (`--outdir`).
    pub out_dir: Option<PathBuf>,

    /// Parallel jobs handed to the build tool; 0 lets the tool decide.
    /// `None` until the command line or a config file sets it.
    pub jobs: Option<usize>,

    pub quiet: bool,
    pub debug: bool,
    pub verbose: bool,

    /// Clean instead of build.
    pub clean: bool,

    /// Explicit full rebuild requested by the user.
    pub rebuild: bool,

    /// Install missing packs before generating.
    pub packs: bool,

    /// Validate YAML input against the schema.
    pub schema_check: bool,

    /// Refuse pack version changes.
    pub frozen_packs: bool,

    /// Let the converter update RTE files.
    pub update_rte: bool,

    /// Backend selection.
    pub backend: Backend,

    /// Toolchain override (`--toolchain`).
    pub toolchain: Option<String>,

    /// CMake generator name, `None` meaning [`DEFAULT_GENERATOR`].
    pub generator: Option<String>,

    /// Build only this CMake target.
    pub target: Option<String>,

    /// Pack loading policy passed to the converter (`--load`).
    pub load: Option<String>,

    /// IDE setup run.
    pub setup: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            contexts: Vec::new(),
            use_context_set: false,
            active_target_set: None,
            output: None,
            int_dir: None,
            out_dir: None,
            jobs: None,
            quiet: false,
            debug: false,
            verbose: false,
            clean: false,
            rebuild: false,
            packs: false,
            schema_check: true,
            frozen_packs: false,
            update_rte: true,
            backend: Backend::default(),
            toolchain: None,
            generator: None,
            target: None,
            load: None,
            setup: false,
        }
    }
}

impl Options {
    /// Check the selection switches for conflicts.
    ///
    /// `--active` excludes both `--context` and `--context-set`.
    pub fn validate(&self) -> Result<(), CbuildError> {
        if self.active_target_set.is_some() {
            if !self.contexts.is_empty() {
                return Err(CbuildError::MutuallyExclusiveSelection {
                    other: "--context",
                });
            }
            if self.use_context_set {
                return Err(CbuildError::MutuallyExclusiveSelection {
                    other: "--context-set",
                });
            }
        }
        if self.setup && (self.use_context_set == self.active_target_set.is_some()) {
            return Err(CbuildError::MissingSelection);
        }
        Ok(())
    }

    /// Whether the legacy backend is selected.
    pub fn is_legacy(&self) -> bool {
        self.backend == Backend::Cbuildgen
    }

    /// Copy handed to a per-context builder.
    /// CMake generator to configure with.
    pub fn generator(&self) -> &str {
        self.generator.as_deref().unwrap_or(DEFAULT_GENERATOR)
    }

    pub fn for_context(&self) -> Options {
        Options {
            rebuild: false,
            clean: false,
            ..self.clone()
        }
    }
}
