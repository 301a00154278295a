//! Core data structures for cbuild.
//!
//! - Context names and filter matching
//! - Command options shared by every operation
//! - The error taxonomy

pub mod context;
pub mod errors;
pub mod options;

pub use context::ContextItem;
pub use errors::CbuildError;
pub use options::{Backend, Options};
