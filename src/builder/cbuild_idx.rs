//! Index backend: contexts described by the build index.
//!
//! `cbuild2cmake` reads the index and writes one CMake super-project into
//! the temp directory with a target per context. Building a context means
//! building that target; the compile-database variant is used by `setup`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::cmake::CMakeBuilder;
use crate::builder::{BuildFlags, Builder};
use crate::core::options::Options;
use crate::state::index::DEFAULT_TMP_DIR;
use crate::state::{get_out_dir, parse_cbuild_index_file};
use crate::util::context::GlobalContext;
use crate::util::fs::{display_path, remove_dir_all_if_exists};
use crate::util::process::Stdio;
use crate::util::shell::Status;
use crate::util::tools::Tool;

/// Suffix of the per-context compile database target.
pub const DATABASE_TARGET_SUFFIX: &str = "-database";

/// Builder for one context of a converted solution.
#[derive(Debug, Clone)]
pub struct CbuildIdxBuilder {
    context: String,
    index: PathBuf,
    options: Options,
}

impl CbuildIdxBuilder {
    pub fn new(context: impl Into<String>, index: impl Into<PathBuf>, options: &Options) -> Self {
        CbuildIdxBuilder {
            context: context.into(),
            index: index.into(),
            options: options.for_context(),
        }
    }

    /// CMake target for this context.
    pub fn default_target(&self) -> String {
        if self.options.setup {
            format!("{}{}", self.context, DATABASE_TARGET_SUFFIX)
        } else {
            self.context.clone()
        }
    }

    fn tmp_dir(&self) -> Result<PathBuf> {
        resolve_tmp_dir(&self.options, &self.index)
    }

    fn generate(&self, gctx: &GlobalContext) -> Result<()> {
        let cmd = gctx
            .tool(Tool::Cbuild2cmake)?
            .arg(&self.index)
            .arg_if(self.options.debug, "--debug");
        gctx.run_checked(&cmd, Stdio::Inherit)?;
        Ok(())
    }
}

/// Temp directory for a solution: `--intdir`, else the index's `tmpdir`
/// relative to the index, else `tmp` next to it.
pub fn resolve_tmp_dir(options: &Options, index_path: &Path) -> Result<PathBuf> {
    if let Some(ref dir) = options.int_dir {
        return Ok(dir.clone());
    }
    if index_path.exists() {
        return Ok(parse_cbuild_index_file(index_path)?.tmp_dir(index_path));
    }
    let base = index_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(DEFAULT_TMP_DIR))
}

impl Builder for CbuildIdxBuilder {
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

        gctx.shell().status(Status::Building, &self.context);
        tracing::info!("building {} from {}", self.context, self.index.display());

        self.generate(gctx)?;

        let tmp_dir = self.tmp_dir()?;
        let target = flags.target.clone().unwrap_or_else(|| self.default_target());
        CMakeBuilder::new(gctx, &self.options, &tmp_dir)
            .target(target)
            .build()?;

        let out_dir = get_out_dir(&self.index, &self.context)?;
        gctx.shell().status(
            Status::Finished,
            format!("{} -> {}", self.context, display_path(gctx.cwd(), &out_dir)),
        );
        Ok(())
    }

    fn clean(&self, gctx: &GlobalContext) -> Result<()> {
        gctx.shell().status(Status::Cleaning, &self.context);

        let dirs = [
            self.tmp_dir()?.join(&self.context),
            get_out_dir(&self.index, &self.context)?,
        ];
        for dir in dirs {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        index_with_contexts, mock_context, write_cbuild, write_index, MockExecutor,
        MockProcessOutput,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_tmp_dir_resolution() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("Solution.cbuild-idx.yml");
        assert_eq!(
            resolve_tmp_dir(&Options::default(), &missing).unwrap(),
            tmp.path().join("tmp")
        );

        let mut idx = index_with_contexts(&["App.Debug+CM0"]);
        idx.tmpdir = Some("build/tmp".into());
        let path = write_index(tmp.path(), &idx);
        assert_eq!(
            resolve_tmp_dir(&Options::default(), &path).unwrap(),
            tmp.path().join("build/tmp")
        );

        let opts = Options {
            int_dir: Some("/scratch".into()),
            ..Options::default()
        };
        assert_eq!(resolve_tmp_dir(&opts, &path).unwrap(), PathBuf::from("/scratch"));
    }

    #[test]
    fn test_default_target() {
        let builder = CbuildIdxBuilder::new("App.Debug+CM0", "idx.yml", &Options::default());
        assert_eq!(builder.default_target(), "App.Debug+CM0");

        let setup = Options {
            setup: true,
            ..Options::default()
        };
        let builder = CbuildIdxBuilder::new("App.Debug+CM0", "idx.yml", &setup);
        assert_eq!(builder.default_target(), "App.Debug+CM0-database");
    }

    #[test]
    fn test_build_sequence() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &index_with_contexts(&["App.Debug+CM0"]));
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let gctx = mock_context(exec.clone(), tmp.path());

        CbuildIdxBuilder::new("App.Debug+CM0", &path, &Options::default())
            .build(&gctx, &BuildFlags::default())
            .unwrap();

        let calls = exec.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("cbuild2cmake "));
        assert!(calls[0].ends_with("Solution.cbuild-idx.yml"));
        assert!(calls[1].starts_with("cmake -G Ninja"));
        assert!(calls[2].ends_with("--target App.Debug+CM0"));
        assert!(gctx
            .shell()
            .captured()
            .iter()
            .any(|l| l.starts_with("Finished App.Debug+CM0")));
    }

    #[test]
    fn test_target_override() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &index_with_contexts(&["App.Debug+CM0"]));
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let gctx = mock_context(exec.clone(), tmp.path());

        let flags = BuildFlags {
            target: Some("App.Debug+CM0-database".into()),
            ..BuildFlags::default()
        };
        CbuildIdxBuilder::new("App.Debug+CM0", &path, &Options::default())
            .build(&gctx, &flags)
            .unwrap();

        assert_eq!(exec.calls_starting_with("cmake --build").len(), 1);
        assert!(exec.calls()[2].ends_with("--target App.Debug+CM0-database"));
    }

    #[test]
    fn test_clean_removes_context_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &index_with_contexts(&["App.Debug+CM0"]));
        write_cbuild(&tmp.path().join("App.Debug+CM0.cbuild.yml"), Some("out/App"));

        let ctx_tmp = tmp.path().join("tmp/App.Debug+CM0");
        let other_tmp = tmp.path().join("tmp/Boot.Debug+CM4");
        let out = tmp.path().join("out/App");
        for dir in [&ctx_tmp, &other_tmp, &out] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let exec = Arc::new(MockExecutor::new());
        let gctx = mock_context(exec.clone(), tmp.path());
        CbuildIdxBuilder::new("App.Debug+CM0", &path, &Options::default())
            .clean(&gctx)
            .unwrap();

        assert!(!ctx_tmp.exists());
        assert!(!out.exists());
        assert!(other_tmp.exists());
        assert!(exec.calls().is_empty());

        let removed: Vec<_> = gctx
            .shell()
            .captured()
            .into_iter()
            .filter(|l| l.starts_with("Removed"))
            .collect();
        assert_eq!(removed.len(), 2);
        assert!(removed[0].ends_with("tmp/App.Debug+CM0"));
        assert!(removed[1].ends_with("out/App"));
    }

    #[test]
    fn test_rebuild_cleans_first() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &index_with_contexts(&["App.Debug+CM0"]));
        let stale = tmp.path().join("tmp/App.Debug+CM0/stale.o");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "").unwrap();

        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let gctx = mock_context(exec.clone(), tmp.path());

        let flags = BuildFlags {
            rebuild: true,
            ..BuildFlags::default()
        };
        CbuildIdxBuilder::new("App.Debug+CM0", &path, &Options::default())
            .build(&gctx, &flags)
            .unwrap();

        assert!(!stale.exists());
        assert_eq!(exec.calls().len(), 3);
    }
}
