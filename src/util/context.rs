//! Global context for one cbuild run.
//!
//! Owns everything that would otherwise be process-wide state: the output
//! shell, the resolved tool locations, the subprocess runner and the timing
//! tracker. Created with [`GlobalContext::init`] at the start of a command
//! and finished with [`GlobalContext::close`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::core::errors::CbuildError;
use crate::util::perf::PerfTracker;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner, Stdio, SystemRunner};
use crate::util::shell::{Shell, Status};
use crate::util::tools::{Tool, ToolPaths};

/// Global context containing output, tools and the process runner.
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// User-facing output
    shell: Shell,

    /// Resolved external tools
    tools: ToolPaths,

    /// Subprocess runner
    runner: Arc<dyn ProcessRunner>,

    /// Per-subprocess timings
    perf: PerfTracker,
}

impl GlobalContext {
    /// Start a run against the real system.
    pub fn init(shell: Shell, tools: ToolPaths) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_runner(
            cwd,
            shell,
            tools,
            Arc::new(SystemRunner),
        ))
    }

    /// Start a run with a custom process runner.
    pub fn with_runner(
        cwd: PathBuf,
        shell: Shell,
        tools: ToolPaths,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        GlobalContext {
            cwd,
            shell,
            tools,
            runner,
            perf: PerfTracker::new(),
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    pub fn perf(&self) -> &PerfTracker {
        &self.perf
    }

    /// Make `path` absolute against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Process builder for an external tool.
    pub fn tool(&self, tool: Tool) -> Result<ProcessBuilder> {
        Ok(ProcessBuilder::new(self.tools.get(tool)?))
    }

    /// Run a subprocess to completion, recording its wall time.
    pub fn run(&self, cmd: &ProcessBuilder, stdio: Stdio) -> Result<ProcessOutput> {
        tracing::debug!("running: {}", cmd.display_command());

        let start = Instant::now();
        let output = self.runner.run(cmd, stdio)?;
        let elapsed = start.elapsed();

        let label = match cmd.get_args().first() {
            Some(first) if !first.starts_with('-') => format!("{} {}", cmd.tool_name(), first),
            _ => cmd.tool_name(),
        };
        self.perf.record(label, elapsed);

        tracing::debug!("exit code {:?} after {:?}", output.code, elapsed);
        Ok(output)
    }

    /// Run a subprocess and turn a non-zero exit into `ToolFailed`.
    pub fn run_checked(&self, cmd: &ProcessBuilder, stdio: Stdio) -> Result<ProcessOutput> {
        let output = self.run(cmd, stdio)?;
        if !output.success() {
            return Err(CbuildError::ToolFailed {
                tool: cmd.tool_name(),
                code: output.code,
            }
            .into());
        }
        Ok(output)
    }

    /// Finish the run: flush the timing report.
    pub fn close(self) {
        let report = self.perf.report();
        for line in &report {
            tracing::debug!("{}", line);
        }
        if self.shell.is_verbose() && !report.is_empty() {
            self.shell.status(Status::Info, "time spent in external tools:");
            for line in report {
                self.shell.note(line);
            }
        }
    }
}
