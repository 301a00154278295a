//! Per-context builders.
//!
//! A solution is built context by context. Each context gets its own
//! [`Builder`], picked once from the configured backend: the legacy
//! project-file backend ([`CprjBuilder`]) or the build-index backend
//! ([`CbuildIdxBuilder`]).

pub mod cbuild_idx;
pub mod cmake;
pub mod cproject;
pub mod dispatch;
pub mod rebuild;

use anyhow::Result;

use crate::core::options::Options;
use crate::state::{get_cprj_file_path, SolutionFiles};
use crate::util::context::GlobalContext;

pub use cbuild_idx::CbuildIdxBuilder;
pub use cmake::CMakeBuilder;
pub use cproject::CprjBuilder;
pub use dispatch::{build_contexts, BuildSummary};
pub use rebuild::need_rebuild;

/// Per-call switches for [`Builder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlags {
    /// Clean only, do not build.
    pub clean: bool,
    /// Clean, then build.
    pub rebuild: bool,
    /// Build this CMake target instead of the context's default.
    pub target: Option<String>,
}

/// Builds and cleans one context.
pub trait Builder {
    /// Context this builder is bound to.
    fn context(&self) -> &str;

    /// Build the context.
    fn build(&self, gctx: &GlobalContext, flags: &BuildFlags) -> Result<()>;

    /// Remove the context's generated files.
    fn clean(&self, gctx: &GlobalContext) -> Result<()>;
}

/// One builder per context, in the given order.
///
/// For the legacy backend each context's project file is looked up in the
/// build index; a single failed lookup fails the whole call.
pub fn get_project_builders(
    options: &Options,
    files: &SolutionFiles,
    contexts: &[String],
) -> Result<Vec<Box<dyn Builder>>> {
    let mut builders: Vec<Box<dyn Builder>> = Vec::with_capacity(contexts.len());

    for context in contexts {
        if options.is_legacy() {
            let cprj = get_cprj_file_path(&files.index, context)?;
            tracing::debug!("{} -> {}", context, cprj.display());
            builders.push(Box::new(CprjBuilder::new(context.as_str(), cprj, options)));
        } else {
            builders.push(Box::new(CbuildIdxBuilder::new(
                context.as_str(),
                &files.index,
                options,
            )));
        }
    }

    Ok(builders)
}
