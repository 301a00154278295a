//! Test utilities and mocks for cbuild unit tests.
//!
//! The build pipeline talks to the outside world only through a
//! [`ProcessRunner`] and the YAML files the converter writes, so a scripted
//! runner plus a few file fixtures is enough to drive it end to end.
//!
//! # Example
//!
//! ```rust,ignore
//! use cbuild::test_support::{MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let exec = MockExecutor::new();
//!     exec.expect("csolution list contexts", MockProcessOutput::success("App.Debug+CM0"));
//!
//!     // Hand the executor to a GlobalContext and run...
//! }
//! ```

pub mod fixtures;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::util::context::GlobalContext;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner, Stdio};
use crate::util::shell::{Shell, Verbosity};
use crate::util::tools::ToolPaths;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            code: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s.as_str()),
            CommandPattern::Contains(s) => cmd.contains(s.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Scripted process runner.
///
/// Commands are matched as `<program> <args...>` strings against the
/// expectations in registration order; the first match wins. Unmatched
/// commands fall back to the default output, or fail.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.expectations.push(CommandExpectation { pattern, output });
        }
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(substring.to_string()), output)
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.default_output = Some(output);
        }
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Commands whose string starts with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl ProcessRunner for MockExecutor {
    fn run(&self, cmd: &ProcessBuilder, _stdio: Stdio) -> Result<ProcessOutput> {
        let full_cmd = cmd.display_command();
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => bail!("mock executor poisoned"),
        };
        state.calls.push(full_cmd.clone());

        if let Some(exp) = state
            .expectations
            .iter()
            .find(|e| e.pattern.matches(&full_cmd))
        {
            return Ok(exp.output.clone().into());
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.clone().into());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

/// A context wired to `exec`, with bare tool names and a capturing shell.
pub fn mock_context(exec: Arc<MockExecutor>, cwd: impl Into<PathBuf>) -> GlobalContext {
    GlobalContext::with_runner(
        cwd.into(),
        Shell::capturing(Verbosity::Normal),
        ToolPaths::bare(),
        exec,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_exact_match() {
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.28.1"));

        let output = exec
            .run(&ProcessBuilder::new("cmake").arg("--version"), Stdio::Capture)
            .unwrap();
        assert!(output.success());
        assert!(output.stdout.contains("3.28.1"));
    }

    #[test]
    fn test_mock_executor_first_match_wins() {
        let exec = MockExecutor::new();
        exec.expect_prefix("csolution list", MockProcessOutput::success("first"));
        exec.expect_contains("contexts", MockProcessOutput::success("second"));

        let output = exec
            .run(
                &ProcessBuilder::new("csolution").args(["list", "contexts"]),
                Stdio::Capture,
            )
            .unwrap();
        assert_eq!(output.stdout, "first");
    }

    #[test]
    fn test_mock_executor_unexpected_command() {
        let exec = MockExecutor::new();
        let result = exec.run(&ProcessBuilder::new("ninja"), Stdio::Inherit);
        assert!(result.is_err());
        assert_eq!(exec.calls(), vec!["ninja"]);
    }

    #[test]
    fn test_mock_executor_default() {
        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::failure(2, "nope"));

        let output = exec
            .run(&ProcessBuilder::new("cpackget").arg("add"), Stdio::Capture)
            .unwrap();
        assert_eq!(output.code, Some(2));
        assert_eq!(output.stderr, "nope");
    }

    #[test]
    fn test_calls_starting_with() {
        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));
        for args in [["--build", "a"], ["-G", "Ninja"]] {
            exec.run(&ProcessBuilder::new("cmake").args(args), Stdio::Inherit)
                .unwrap();
        }
        assert_eq!(exec.calls_starting_with("cmake --build"), vec!["cmake --build a"]);
    }
}
