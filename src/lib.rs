//! Crate entry point for **unity-launch**.
//!
//! This library provides the internal implementation for the `unity-launch`
//! CLI. Each submodule encapsulates one responsibility (startup context,
//! logging, git operations, editor resolution, user prompts, orchestration).
//! The `pub use` re-exports make the pieces `main.rs` needs accessible
//! directly from the crate root.

mod context;
mod editor;
mod git;
mod logger;
mod prompt;
mod run;

/// Re-export commonly used types and the entry command so they can be
/// accessed from `unity_launch::*`.
pub use context::RunContext;
pub use logger::Logger;
pub use run::cmd_open;
