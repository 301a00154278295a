//! Implementation of `cbuild <input>` and `cbuild setup`.
//!
//! Solution pipeline: install packs, convert, select contexts, decide on a
//! rebuild, then build each context. A `.cprj` input skips straight to the
//! legacy builder.

use std::path::Path;

use anyhow::Result;

use crate::builder::cbuild_idx::resolve_tmp_dir;
use crate::builder::cproject::CprjBuilder;
use crate::builder::rebuild::{need_rebuild, remove_cmake_cache};
use crate::builder::{build_contexts, get_project_builders, BuildFlags, Builder};
use crate::core::context::resolve_contexts;
use crate::core::errors::CbuildError;
use crate::core::options::Options;
use crate::ops::generate::generate_build_files;
use crate::ops::packs::install_missing_packs;
use crate::state::{get_selected_contexts, is_solution_file, SolutionFiles};
use crate::util::context::GlobalContext;

/// What the positional input names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `*.csolution.yml` / `*.csolution.yaml`
    Solution,
    /// `*.cprj`
    Project,
}

/// Classify the input by its file name; it must exist.
pub fn classify_input(path: &Path) -> Result<InputKind, CbuildError> {
    let kind = if is_solution_file(path) {
        InputKind::Solution
    } else if path.extension().is_some_and(|e| e == "cprj") {
        InputKind::Project
    } else {
        return Err(CbuildError::InvalidInputFile {
            path: path.to_path_buf(),
            reason: "expected a *.csolution.yml or *.cprj file".to_string(),
        });
    };

    if !path.is_file() {
        return Err(CbuildError::InvalidInputFile {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }
    Ok(kind)
}

/// Build (or clean) whatever `input` names.
pub fn cbuild_build(gctx: &GlobalContext, options: &Options, input: &Path) -> Result<()> {
    options.validate()?;

    let input = gctx.resolve_path(input);
    match classify_input(&input)? {
        InputKind::Solution => build_solution(gctx, options, &input),
        InputKind::Project => build_project(gctx, options, &input),
    }
}

/// Build a single legacy project file.
pub fn build_project(gctx: &GlobalContext, options: &Options, cprj: &Path) -> Result<()> {
    let builder = CprjBuilder::from_file(cprj, options);
    let flags = BuildFlags {
        clean: options.clean,
        rebuild: options.rebuild,
        target: options.target.clone(),
    };
    builder.build(gctx, &flags)
}

/// Contexts to build, from `--context` filters, the pinned set, or the
/// whole index.
pub fn select_contexts(options: &Options, files: &SolutionFiles) -> Result<Vec<String>> {
    let contexts = if !options.contexts.is_empty() {
        let all = get_selected_contexts(&files.index, false)?;
        resolve_contexts(&all, &options.contexts)?
    } else if options.use_context_set {
        get_selected_contexts(&files.set, true)?
    } else {
        get_selected_contexts(&files.index, false)?
    };

    if contexts.is_empty() {
        return Err(CbuildError::NoContextFound.into());
    }
    Ok(contexts)
}

/// Full solution pipeline.
pub fn build_solution(gctx: &GlobalContext, options: &Options, solution: &Path) -> Result<()> {
    let files = SolutionFiles::new(solution, options.output.as_deref());
    tracing::debug!("solution files: {:?}", files);

    if options.packs || options.setup {
        if let Err(e) = install_missing_packs(gctx, options, &files.solution) {
            if !options.setup {
                return Err(e);
            }
            gctx.shell().warn(format!("pack installation failed: {:#}", e));
        }
    }

    generate_build_files(gctx, options, &files)?;

    let contexts = select_contexts(options, &files)?;
    tracing::info!("selected contexts: {}", contexts.join(", "));

    let builders = get_project_builders(options, &files, &contexts)?;

    if options.clean {
        for builder in &builders {
            builder.clean(gctx)?;
        }
        return Ok(());
    }

    if options.rebuild || need_rebuild(options, &files.index, gctx.cwd())? {
        if !options.is_legacy() {
            remove_cmake_cache(&resolve_tmp_dir(options, &files.index)?)?;
        }
        for builder in &builders {
            builder.clean(gctx)?;
        }
    }

    if let Some(ref target) = options.target {
        let builder = builders.first().ok_or(CbuildError::NoContextFound)?;
        let flags = BuildFlags {
            target: Some(target.clone()),
            ..BuildFlags::default()
        };
        return builder.build(gctx, &flags);
    }

    build_contexts(gctx, &builders, options.setup).into_result()
}
