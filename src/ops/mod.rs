//! High-level operations.
//!
//! This module contains the implementation of cbuild commands.

pub mod cbuild_build;
pub mod generate;
pub mod list;
pub mod packs;

pub use cbuild_build::{build_project, build_solution, cbuild_build, classify_input, InputKind};
pub use generate::generate_build_files;
pub use list::{environment, list_configurations, list_contexts, list_target_sets, list_toolchains};
pub use packs::install_missing_packs;
