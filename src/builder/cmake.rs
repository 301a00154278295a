//! CMake driver for generated build trees.
//!
//! Both backends end the same way: a generator tool writes a
//! `CMakeLists.txt` into a directory, then CMake configures that directory
//! in place and builds it with Ninja (or the configured generator).

use std::path::PathBuf;

use anyhow::Result;

use crate::core::options::Options;
use crate::util::context::GlobalContext;
use crate::util::fs::ensure_dir;
use crate::util::process::{ProcessBuilder, Stdio};
use crate::util::tools::Tool;

/// How much CMake itself should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CMakeLogLevel {
    /// `--log-level=ERROR`
    Quiet,
    #[default]
    Normal,
    /// `--verbose` on the build step only.
    Verbose,
    /// `--log-level=VERBOSE` and `--verbose`.
    Debug,
}

impl CMakeLogLevel {
    /// Pick the level from the quiet/verbose/debug switches. Debug wins.
    pub fn from_options(options: &Options) -> Self {
        if options.debug {
            CMakeLogLevel::Debug
        } else if options.quiet {
            CMakeLogLevel::Quiet
        } else if options.verbose {
            CMakeLogLevel::Verbose
        } else {
            CMakeLogLevel::Normal
        }
    }
}

/// Configure-and-build driver for one CMake tree.
pub struct CMakeBuilder<'a> {
    gctx: &'a GlobalContext,
    source_dir: PathBuf,
    build_dir: PathBuf,
    generator: String,
    jobs: usize,
    target: Option<String>,
    log_level: CMakeLogLevel,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a driver that configures and builds `dir` in place.
    pub fn new(gctx: &'a GlobalContext, options: &Options, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        CMakeBuilder {
            gctx,
            source_dir: dir.clone(),
            build_dir: dir,
            generator: options.generator().to_string(),
            jobs: options.jobs.unwrap_or(0),
            target: None,
            log_level: CMakeLogLevel::from_options(options),
        }
    }

    /// Build a single target instead of the default one.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// `cmake -G <generator> -S <src> -B <build> -Wno-dev [--log-level=...]`
    pub fn configure_command(&self) -> Result<ProcessBuilder> {
        let mut cmd = self
            .gctx
            .tool(Tool::Cmake)?
            .arg("-G")
            .arg(&self.generator)
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .arg("-Wno-dev");

        match self.log_level {
            CMakeLogLevel::Debug => cmd = cmd.arg("--log-level=VERBOSE"),
            CMakeLogLevel::Quiet => cmd = cmd.arg("--log-level=ERROR"),
            CMakeLogLevel::Normal | CMakeLogLevel::Verbose => {}
        }

        Ok(cmd)
    }

    /// `cmake --build <build> [-j <n>] [--target <t>] [--verbose]`
    pub fn build_command(&self) -> Result<ProcessBuilder> {
        let mut cmd = self.gctx.tool(Tool::Cmake)?.arg("--build").arg(&self.build_dir);

        // 0 lets the generator pick its own parallelism
        if self.jobs > 0 {
            cmd = cmd.arg("-j").arg(self.jobs.to_string());
        }

        if let Some(ref target) = self.target {
            cmd = cmd.arg("--target").arg(target);
        }

        if matches!(self.log_level, CMakeLogLevel::Verbose | CMakeLogLevel::Debug) {
            cmd = cmd.arg("--verbose");
        }

        Ok(cmd)
    }

    /// Configure, then build.
    pub fn build(&self) -> Result<()> {
        ensure_dir(&self.build_dir)?;
        self.configure()?;
        self.compile()
    }

    /// Run CMake configuration.
    pub fn configure(&self) -> Result<()> {
        tracing::debug!("configuring {}", self.build_dir.display());
        let cmd = self.configure_command()?;
        self.gctx.run_checked(&cmd, Stdio::Inherit)?;
        Ok(())
    }

    /// Run the CMake build step.
    pub fn compile(&self) -> Result<()> {
        tracing::debug!(
            "building {} (target: {})",
            self.build_dir.display(),
            self.target.as_deref().unwrap_or("all")
        );
        let cmd = self.build_command()?;
        self.gctx.run_checked(&cmd, Stdio::Inherit)?;
        Ok(())
    }
}
