//! Converter invocation: solution to build index.
//!
//! `csolution convert` resolves the solution and writes the build index, the
//! per-context metadata and (for the legacy backend) the project files.
//! Its warnings are mostly informational, except for unregistered
//! toolchains, which would silently produce a broken build.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::errors::CbuildError;
use crate::core::options::Options;
use crate::state::{parse_cbuild_index_file, SolutionFiles};
use crate::util::context::GlobalContext;
use crate::util::process::{ProcessBuilder, Stdio};
use crate::util::shell::Status;
use crate::util::tools::Tool;

/// Converter exit code for "solution needs layer variables defined".
pub const EXIT_UNDEFINED_LAYERS: i32 = 2;

static NO_COMPILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"no compiler registered for '([^']+)'").expect("valid regex")
});

/// `csolution convert <sln>` with every selection and behaviour switch.
///
/// `bootstrap` replaces the `--context` filters when set.
pub fn convert_command(
    gctx: &GlobalContext,
    options: &Options,
    files: &SolutionFiles,
    bootstrap: Option<&str>,
) -> Result<ProcessBuilder> {
    let mut cmd = gctx
        .tool(Tool::Csolution)?
        .arg("convert")
        .arg(&files.solution);

    match bootstrap {
        Some(context) => cmd = cmd.arg("-c").arg(context),
        None => {
            for context in &options.contexts {
                cmd = cmd.arg("-c").arg(context);
            }
        }
    }
    cmd = cmd.arg_if(options.use_context_set, "-S");
    if let Some(ref active) = options.active_target_set {
        cmd = cmd.arg("-a").arg(active);
    }
    if let Some(ref toolchain) = options.toolchain {
        cmd = cmd.arg("-t").arg(toolchain);
    }
    if let Some(ref output) = options.output {
        cmd = cmd.arg("-o").arg(output);
    }
    if let Some(ref load) = options.load {
        cmd = cmd.arg("-l").arg(load);
    }

    cmd = cmd
        .arg_if(options.is_legacy(), "--cbuildgen")
        .arg_if(!options.schema_check, "--no-check-schema")
        .arg_if(!options.update_rte, "--no-update-rte")
        .arg_if(options.frozen_packs, "--frozen-packs");

    if options.quiet {
        cmd = cmd.arg("-q");
    } else if options.debug {
        cmd = cmd.arg("-d");
    } else if options.verbose {
        cmd = cmd.arg("-v");
    }

    Ok(cmd)
}

/// Whether `setup --context-set` runs for the first time: no set file yet
/// and no explicit contexts, so one context has to be picked.
pub fn needs_bootstrap(options: &Options, files: &SolutionFiles) -> bool {
    options.setup
        && options.use_context_set
        && options.contexts.is_empty()
        && options.active_target_set.is_none()
        && !files.set.exists()
}

/// First context declared in the solution.
pub fn first_context(gctx: &GlobalContext, files: &SolutionFiles) -> Result<Option<String>> {
    let cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "contexts"])
        .arg(&files.solution)
        .arg("-q");
    let output = gctx.run_checked(&cmd, Stdio::Capture)?;
    let first = output.stdout_lines().next().map(String::from);
    Ok(first)
}

/// Run the converter and check what it left behind.
pub fn generate_build_files(
    gctx: &GlobalContext,
    options: &Options,
    files: &SolutionFiles,
) -> Result<()> {
    let bootstrap = if needs_bootstrap(options, files) {
        let first = first_context(gctx, files)?;
        if let Some(ref context) = first {
            tracing::info!("no context set yet, starting with {}", context);
        }
        first
    } else {
        None
    };

    let cmd = convert_command(gctx, options, files, bootstrap.as_deref())?;

    gctx.shell()
        .status(Status::Generating, files.solution.display());
    let spinner = gctx.shell().spinner("csolution convert");
    let output = gctx.run(&cmd, Stdio::Capture);
    spinner.finish_and_clear();
    let output = output?;
    gctx.shell().passthrough(&output.stdout, &output.stderr);

    if !output.success() {
        let failed = CbuildError::ToolFailed {
            tool: cmd.tool_name(),
            code: output.code,
        };

        if !options.setup {
            return Err(failed.into());
        }

        if output.code == Some(EXIT_UNDEFINED_LAYERS) {
            update_layers_index(gctx, options, files)?;
            if let Some(hint) = undefined_layer_hint(&output.stderr) {
                gctx.shell().warn(hint);
            }
            return Err(failed.into());
        }

        gctx.shell().error(&failed);
        if !files.index.exists() {
            return Err(failed.into());
        }
        tracing::info!("continuing setup with the existing build index");
    }

    check_warnings(files)
}

/// `csolution list layers <sln> --update-idx`, recording compatible layers
/// in the index so an IDE can offer them.
fn update_layers_index(gctx: &GlobalContext, options: &Options, files: &SolutionFiles) -> Result<()> {
    let mut cmd = gctx
        .tool(Tool::Csolution)?
        .args(["list", "layers"])
        .arg(&files.solution)
        .arg("--update-idx");
    for context in &options.contexts {
        cmd = cmd.arg("-c").arg(context);
    }
    cmd = cmd.arg_if(options.use_context_set, "-S");
    if let Some(ref active) = options.active_target_set {
        cmd = cmd.arg("-a").arg(active);
    }

    let output = gctx.run(&cmd, Stdio::Capture)?;
    gctx.shell().passthrough(&output.stdout, &output.stderr);
    Ok(())
}

/// Hint naming the layer variables the converter reported as undefined.
pub fn undefined_layer_hint(stderr: &str) -> Option<String> {
    if !stderr.contains("undefined variables in") {
        return None;
    }

    let mut variables: Vec<String> = Vec::new();
    for line in stderr.lines() {
        let name = line
            .trim()
            .trim_start_matches('-')
            .trim()
            .trim_matches('$');
        if name.ends_with("-Layer") && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }

    if variables.is_empty() {
        return Some(
            "the solution uses undefined variables; define them or run `csolution list layers`"
                .to_string(),
        );
    }
    Some(format!(
        "define {} in the solution; compatible layers were recorded in the build index \
         (see `csolution list layers`)",
        variables
            .iter()
            .map(|v| format!("`${}$`", v))
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

/// Toolchain names from "no compiler registered" warnings, deduplicated.
pub fn unregistered_toolchains(warnings: &[String]) -> Vec<String> {
    let mut toolchains: Vec<String> = Vec::new();
    for warning in warnings {
        for caps in NO_COMPILER.captures_iter(warning) {
            let name = &caps[1];
            if !toolchains.iter().any(|t| t == name) {
                toolchains.push(name.to_string());
            }
        }
    }
    toolchains
}

/// Turn converter warnings about missing compilers into a hard error.
fn check_warnings(files: &SolutionFiles) -> Result<()> {
    if !files.index.exists() {
        return Ok(());
    }
    let index = parse_cbuild_index_file(&files.index)?;
    let warnings = index.unique_warnings();

    let toolchains = unregistered_toolchains(&warnings);
    if !toolchains.is_empty() {
        return Err(CbuildError::NoCompilerRegistered { toolchains }.into());
    }

    for warning in &warnings {
        tracing::debug!("converter warning: {}", warning);
    }
    Ok(())
}
