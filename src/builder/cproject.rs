//! Legacy backend: one `.cprj` project file per context.
//!
//! `cbuildgen` turns the project file into a CMake tree inside the
//! intermediate directory, which is then configured and built in place.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::cmake::CMakeBuilder;
use crate::builder::{BuildFlags, Builder};
use crate::core::options::Options;
use crate::util::context::GlobalContext;
use crate::util::fs::{display_path, ensure_dir, remove_dir_all_if_exists};
use crate::util::process::Stdio;
use crate::util::shell::Status;
use crate::util::tools::Tool;

/// Default intermediate directory, next to the project file.
pub const DEFAULT_INT_DIR: &str = "IntDir";

/// Default output directory, next to the project file.
pub const DEFAULT_OUT_DIR: &str = "OutDir";

/// Builder for a single legacy project file.
#[derive(Debug, Clone)]
pub struct CprjBuilder {
    context: String,
    cprj: PathBuf,
    options: Options,
}

impl CprjBuilder {
    pub fn new(context: impl Into<String>, cprj: impl Into<PathBuf>, options: &Options) -> Self {
        CprjBuilder {
            context: context.into(),
            cprj: cprj.into(),
            options: options.for_context(),
        }
    }

    /// Builder for a project file given on the command line; the context
    /// name is the file stem.
    pub fn from_file(cprj: &Path, options: &Options) -> Self {
        let context = cprj
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        CprjBuilder::new(context, cprj, options)
    }

    fn project_dir(&self) -> &Path {
        self.cprj.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Intermediate directory: `--intdir` or `<cprj-dir>/IntDir`.
    pub fn int_dir(&self) -> PathBuf {
        self.options
            .int_dir
            .clone()
            .unwrap_or_else(|| self.project_dir().join(DEFAULT_INT_DIR))
    }

    /// Output directory: `--outdir` or `<cprj-dir>/OutDir`.
    pub fn out_dir(&self) -> PathBuf {
        self.options
            .out_dir
            .clone()
            .unwrap_or_else(|| self.project_dir().join(DEFAULT_OUT_DIR))
    }

    /// Resolve and install the packs this project needs.
    fn install_packs(&self, gctx: &GlobalContext, int_dir: &Path) -> Result<()> {
        let cmd = gctx
            .tool(Tool::Cbuildgen)?
            .arg("packlist")
            .arg(&self.cprj)
            .arg(format!("--intdir={}", int_dir.display()));
        gctx.run_checked(&cmd, Stdio::Inherit)?;

        let cpinstall = int_dir.join(format!("{}.cpinstall", self.context));
        if !cpinstall.is_file() {
            tracing::debug!("no pack list at {}, nothing to install", cpinstall.display());
            return Ok(());
        }

        gctx.shell().status(Status::Installing, format!("packs for {}", self.context));
        let cmd = gctx
            .tool(Tool::Cpackget)?
            .args(["add", "-a", "-f"])
            .arg(&cpinstall);
        gctx.run_checked(&cmd, Stdio::Inherit)?;
        Ok(())
    }

    /// Generate the CMake tree from the project file.
    fn generate(&self, gctx: &GlobalContext, int_dir: &Path, out_dir: &Path) -> Result<()> {
        let cmd = gctx
            .tool(Tool::Cbuildgen)?
            .arg("cmake")
            .arg(&self.cprj)
            .arg(format!("--outdir={}", out_dir.display()))
            .arg(format!("--intdir={}", int_dir.display()))
            .arg_if(self.options.update_rte, "--update-rte")
            .args(
                self.options
                    .toolchain
                    .as_ref()
                    .map(|t| format!("--toolchain={}", t)),
            )
            .arg_if(self.options.quiet, "--quiet");
        gctx.run_checked(&cmd, Stdio::Inherit)?;
        Ok(())
    }
}

impl Builder for CprjBuilder {
    fn context(&self) -> &str {
        &self.context
    }

    fn build(&self, gctx: &GlobalContext, flags: &BuildFlags) -> Result<()> {
        if flags.clean {
            return self.clean(gctx);
        }
        if flags.rebuild {
            self.clean(gctx)?;
        }

        let int_dir = self.int_dir();
        let out_dir = self.out_dir();
        ensure_dir(&int_dir)?;

        gctx.shell().status(Status::Building, &self.context);
        tracing::info!("building {} from {}", self.context, self.cprj.display());

        if self.options.packs {
            self.install_packs(gctx, &int_dir)?;
        }
        self.generate(gctx, &int_dir, &out_dir)?;

        let mut cmake = CMakeBuilder::new(gctx, &self.options, &int_dir);
        if let Some(ref target) = flags.target {
            cmake = cmake.target(target);
        }
        cmake.build()?;

        gctx.shell().status(
            Status::Finished,
            format!("{} -> {}", self.context, display_path(gctx.cwd(), &out_dir)),
        );
        Ok(())
    }

    fn clean(&self, gctx: &GlobalContext) -> Result<()> {
        gctx.shell().status(Status::Cleaning, &self.context);
        for dir in [self.int_dir(), self.out_dir()] {
            if dir.exists() {
                tracing::debug!("removing {}", dir.display());
                remove_dir_all_if_exists(&dir)?;
                gctx.shell()
                    .status(Status::Removed, display_path(gctx.cwd(), &dir));
            }
        }
        Ok(())
    }
}
