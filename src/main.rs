//! # unity-launch
//!
//! **unity-launch** syncs a git-tracked Unity project with its remote branch
//! and opens it in the matching Unity editor.
//!
//! Behavior is fully determined by the executable's own location (it must
//! live in the Unity project root) and the ambient environment; there are no
//! flags beyond `--help` and `--version`.
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::Parser;
use unity_launch::cmd_open;

/// Command-line interface definition.
///
/// Parsed using `clap` derive macros. No arguments; parsing only provides
/// `--help`/`--version` handling.
#[derive(Parser, Debug)]
#[command(
    name = "unity-launch",
    version,
    about = "Sync a git-tracked Unity project with its remote and open it in the matching Unity editor"
)]
struct Cli {}

/// CLI entry point.
///
/// Any error propagated here exits with the generic code 1; classified
/// failures exit with their own codes before ever returning.
fn main() -> Result<()> {
    let _cli = Cli::parse();
    cmd_open()
}
