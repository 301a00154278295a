//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod perf;
pub mod process;
pub mod shell;
pub mod tools;

pub use config::Config;
pub use context::GlobalContext;
pub use shell::Shell;
