//! Git integration layer.
//!
//! This module wraps the actual backend implementation (`cli_backend`)
//! and re-exports only the stable public API ([`Git`]).
//!
//! The backend shells out to the `git` executable discovered at startup;
//! hiding it behind this facade keeps the rest of the codebase independent
//! of how git is actually invoked.

mod cli_backend;

pub use cli_backend::Git;
