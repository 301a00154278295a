//! User-facing status output.
//!
//! All status lines go through [`Shell`] so that alignment, colour and the
//! `--quiet`/`--verbose` switches are handled in one place. Diagnostics
//! meant for debugging go through `tracing` instead.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no spinners
    Quiet,
    /// Default: status messages + spinners
    #[default]
    Normal,
    /// --verbose: status messages, timing report, no spinners
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Removed,
    Installed,

    // In-progress statuses (cyan)
    Generating,
    Installing,
    Building,
    Cleaning,

    // Info statuses (blue/default)
    Info,
    Summary,

    // Warning statuses (yellow)
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    /// Get the display text for this status.
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Installed => "Installed",
            Status::Generating => "Generating",
            Status::Installing => "Installing",
            Status::Building => "Building",
            Status::Cleaning => "Cleaning",
            Status::Info => "Info",
            Status::Summary => "Summary",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    /// Get the ANSI color code for this status.
    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Removed | Status::Installed => "\x1b[1;32m",
            Status::Generating | Status::Installing | Status::Building | Status::Cleaning => {
                "\x1b[1;36m"
            }
            Status::Info | Status::Summary => "\x1b[1;34m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width status labels are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    /// When set, lines are recorded here instead of being printed.
    captured: Mutex<Option<Vec<String>>>,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            captured: Mutex::new(None),
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    /// A shell that records its output instead of printing it.
    pub fn capturing(verbosity: Verbosity) -> Self {
        Shell {
            verbosity,
            use_color: false,
            captured: Mutex::new(Some(Vec::new())),
        }
    }

    /// Lines recorded by a capturing shell.
    pub fn captured(&self) -> Vec<String> {
        self.captured
            .lock()
            .ok()
            .and_then(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. In quiet mode only errors print.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }

        let line = format!("{} {}", self.format_status(status), msg);
        if self.record(&line) {
            return;
        }
        eprintln!("{}", line);
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    /// Forward text produced by a child process, unformatted.
    pub fn passthrough(&self, stdout: &str, stderr: &str) {
        if self.record_raw(stdout, stderr) {
            return;
        }
        if !stdout.is_empty() && !self.is_quiet() {
            print!("{}", stdout);
        }
        if !stderr.is_empty() {
            eprint!("{}", stderr);
        }
    }

    /// Spinner shown while waiting on a child with captured output.
    ///
    /// Hidden unless stderr is a terminal and verbosity is normal.
    pub fn spinner(&self, msg: impl Display) -> ProgressBar {
        let visible = self.verbosity == Verbosity::Normal
            && io::stderr().is_terminal()
            && self.is_printing();
        if !visible {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn is_printing(&self) -> bool {
        self.captured.lock().map(|c| c.is_none()).unwrap_or(true)
    }

    fn record(&self, line: &str) -> bool {
        match self.captured.lock() {
            Ok(mut guard) => match guard.as_mut() {
                Some(lines) => {
                    lines.push(line.trim_start().to_string());
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn record_raw(&self, stdout: &str, stderr: &str) -> bool {
        match self.captured.lock() {
            Ok(mut guard) => match guard.as_mut() {
                Some(lines) => {
                    lines.extend(stdout.lines().chain(stderr.lines()).map(String::from));
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// Format a duration in a human-readable way.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        format!("{}m {:.0}s", mins, secs - mins * 60.0)
    }
}
