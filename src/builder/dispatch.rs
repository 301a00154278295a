//! Serial, fail-forward build of several contexts.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::builder::{BuildFlags, Builder};
use crate::util::context::GlobalContext;
use crate::util::shell::{format_duration, Status};

/// Outcome of building a list of contexts.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Total wall time across all contexts.
    pub elapsed: Duration,
    /// Error of the last context that failed.
    pub last_error: Option<anyhow::Error>,
}

impl BuildSummary {
    /// `"2 succeeded, 1 failed"`
    pub fn summary_line(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded, self.failed)
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// `Err` when at least one context failed, carrying the last failure.
    pub fn into_result(self) -> Result<()> {
        match self.last_error {
            Some(err) if self.failed > 0 => Err(err.context(format!(
                "{} of {} contexts failed to build",
                self.failed,
                self.failed + self.succeeded
            ))),
            _ => Ok(()),
        }
    }
}

/// Build every builder in order, continuing past failures.
///
/// Each builder runs with default flags. Unless `setup` is set, a summary
/// line with counts and elapsed time is printed at the end.
pub fn build_contexts(
    gctx: &GlobalContext,
    builders: &[Box<dyn Builder>],
    setup: bool,
) -> BuildSummary {
    let mut summary = BuildSummary::default();
    let start = Instant::now();
    let flags = BuildFlags::default();

    for (i, builder) in builders.iter().enumerate() {
        tracing::info!("({}/{}) {}", i + 1, builders.len(), builder.context());

        match builder.build(gctx, &flags) {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                gctx.shell()
                    .error(format!("build of {} failed: {:#}", builder.context(), err));
                summary.failed += 1;
                summary.last_error = Some(err);
            }
        }
    }

    summary.elapsed = start.elapsed();

    if !setup {
        let status = if summary.is_success() {
            Status::Summary
        } else {
            Status::Error
        };
        gctx.shell().status(
            status,
            format!(
                "{} in {}",
                summary.summary_line(),
                format_duration(summary.elapsed)
            ),
        );
    }

    summary
}
