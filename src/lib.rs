//! cbuild - build orchestrator for CMSIS csolution projects
//!
//! This crate drives the external project tools (converter, pack manager,
//! CMake generators) to turn a solution or legacy project file into built
//! artifacts, one context at a time.

pub mod builder;
pub mod core;
pub mod ops;
pub mod state;
pub mod util;

/// Test utilities and mocks for cbuild unit tests.
///
/// This module is only available when running tests. It provides a scripted
/// process runner and writers for the persisted build state.
#[cfg(test)]
pub mod test_support;

pub use core::{errors::CbuildError, options::Options};
pub use util::context::GlobalContext;
