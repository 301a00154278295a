//! Error taxonomy for cbuild.
//!
//! Configuration errors are raised before any subprocess runs, resolution
//! errors when a context or filter cannot be matched against the persisted
//! build state, and tool errors when an external program exits non-zero.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the cbuild core.
#[derive(Debug, Error)]
pub enum CbuildError {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// `--active` combined with `--context` or `--context-set`.
    #[error("invalid combination: --active cannot be used together with {other}")]
    MutuallyExclusiveSelection { other: &'static str },

    /// `setup` called without exactly one selection mode.
    #[error("setup requires exactly one of --context-set or --active")]
    MissingSelection,

    /// Input file missing or with an unsupported extension.
    #[error("invalid input file `{}`: {reason}", path.display())]
    InvalidInputFile { path: PathBuf, reason: String },

    // =========================================================================
    // Resolution errors
    // =========================================================================
    /// Context string does not follow `[project][.build][+target]`.
    #[error("invalid context `{context}`: expected [project][.build-type][+target-type]")]
    InvalidContextFormat { context: String },

    /// A `--context` filter matched none of the known contexts.
    #[error("no suitable context found for filter `{filter}`")]
    NoFilteredContextFound { filter: String },

    /// No legacy project file recorded for a context.
    #[error("no project file (.cprj) found for context `{context}`")]
    CprjNotFound { context: String },

    /// Selection resolved to an empty list.
    #[error("no context found to build")]
    NoContextFound,

    // =========================================================================
    // External tool errors
    // =========================================================================
    /// The converter reported toolchains without a registered compiler.
    #[error("no compiler registered for: {}", toolchains.join(", "))]
    NoCompilerRegistered { toolchains: Vec<String> },

    /// An external tool could not be located.
    #[error("`{tool}` not found")]
    ToolNotFound { tool: String },

    /// An external tool exited with a non-zero status.
    #[error("`{tool}` failed{}", code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    ToolFailed { tool: String, code: Option<i32> },
}

impl CbuildError {
    /// Process exit code for this error.
    ///
    /// Converter exit codes belong to its own error taxonomy and are passed
    /// through verbatim; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CbuildError::ToolFailed {
                tool,
                code: Some(code),
            } if tool == "csolution" && *code > 0 => *code,
            _ => 1,
        }
    }

    /// Suggested next step for the user, if there is one.
    pub fn hint(&self) -> Option<String> {
        match self {
            CbuildError::NoFilteredContextFound { .. } | CbuildError::NoContextFound => {
                Some("run `cbuild list contexts <solution>` to see the available contexts".into())
            }
            CbuildError::InvalidContextFormat { .. } => {
                Some("contexts look like `Project.Debug+Target`; any part may be omitted".into())
            }
            CbuildError::NoCompilerRegistered { toolchains } => Some(format!(
                "register the toolchain with an environment variable such as `{}_TOOLCHAIN_<major>_<minor>_<patch>=<path>`",
                toolchains.first().map(String::as_str).unwrap_or("AC6")
            )),
            CbuildError::ToolNotFound { tool } => Some(format!(
                "install `{}` or set its path in the [tools] section of ~/.cbuild/config.toml",
                tool
            )),
            CbuildError::MissingSelection => {
                Some("use `cbuild setup <solution> --context-set` or `--active <target-type>`".into())
            }
            _ => None,
        }
    }
}

/// Exit code for an arbitrary error chain.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<CbuildError>())
        .map(CbuildError::exit_code)
        .unwrap_or(1)
}

/// Hint for an arbitrary error chain.
pub fn hint_of(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .find_map(|e| e.downcast_ref::<CbuildError>())
        .and_then(CbuildError::hint)
}
