//! Subprocess execution utilities.
//!
//! Every external tool (converter, pack installer, CMake, Ninja) is started
//! through a [`ProcessRunner`] so the build pipeline can be exercised
//! without the tools installed.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio as StdStdio};

use anyhow::{Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Add an argument only when `cond` holds.
    pub fn arg_if(self, cond: bool, arg: impl AsRef<OsStr>) -> Self {
        if cond {
            self.arg(arg)
        } else {
            self
        }
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Short tool name (file stem of the program), used in error messages.
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// How the child's output streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stdio {
    /// Capture stdout and stderr for inspection.
    Capture,
    /// Stream straight to the terminal.
    Inherit,
}

/// Result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty when inherited).
    pub stdout: String,
    /// Captured stderr (empty when inherited).
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Non-empty, trimmed stdout lines.
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Something that can run a subprocess to completion.
///
/// Calls block until the child exits; there is no timeout.
pub trait ProcessRunner {
    fn run(&self, cmd: &ProcessBuilder, stdio: Stdio) -> Result<ProcessOutput>;
}

/// Runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder, stdio: Stdio) -> Result<ProcessOutput> {
        let mut command = cmd.build_command();

        match stdio {
            Stdio::Capture => {
                command.stdin(StdStdio::null());
                command.stdout(StdStdio::piped());
                command.stderr(StdStdio::piped());

                let output = command
                    .output()
                    .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;

                Ok(ProcessOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            Stdio::Inherit => {
                let status = command
                    .status()
                    .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;

                Ok(ProcessOutput {
                    code: status.code(),
                    ..ProcessOutput::default()
                })
            }
        }
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
