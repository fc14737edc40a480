use anyhow::{Context, Result, bail};
use regex::Regex;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use crate::context::EXIT_NOT_A_REPO;
use crate::logger::Logger;

static COMMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"commit ([0-9a-f]{40})").expect("commit id regex"));

/// Returned by [`Git::latest_commit_id`] when no commit id can be parsed.
/// A valid sentinel, not an error condition.
pub const UNKNOWN_COMMIT: &str = "Unknown";

/// Runner for git subcommands inside the project directory.
///
/// Holds the executable path resolved at startup, the working directory and
/// a logger reference. All invocations block until git finishes; there is no
/// timeout, so a hanging git hangs the launcher with it.
pub struct Git<'a> {
    exec: PathBuf,
    workdir: PathBuf,
    logger: &'a Logger,
}

impl<'a> Git<'a> {
    pub fn new(exec: &Path, workdir: &Path, logger: &'a Logger) -> Git<'a> {
        Git {
            exec: exec.to_path_buf(),
            workdir: workdir.to_path_buf(),
            logger,
        }
    }

    /// Run a git subcommand, mirroring its output into the log.
    ///
    /// Each stdout line becomes an INFO entry and each stderr line an ERROR
    /// entry, prefixed with the subcommand for traceability. A non-zero exit
    /// code is FATAL (generic code 1).
    ///
    /// stdout is drained before stderr.
    pub fn run(&self, args: &[&str]) -> Result<()> {
        let display = args.join(" ");
        self.logger
            .info("git.run", &format!("Executing Git command: '{display}'"));

        let mut child = Command::new(&self.exec)
            .args(args)
            .current_dir(&self.workdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start git {display}"))?;

        if let Some(out) = child.stdout.take() {
            for line in BufReader::new(out).lines() {
                let line = line?;
                self.logger
                    .info("git.run", &format!("git {display}: {}", line.trim()));
            }
        }
        if let Some(err) = child.stderr.take() {
            for line in BufReader::new(err).lines() {
                let line = line?;
                self.logger
                    .error("git.run", &format!("git {display}: {}", line.trim()));
            }
        }

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for git {display}"))?;
        if !status.success() {
            self.logger.fatal(
                "git.run",
                &format!(
                    "'git {display}' returned a non-zero exit code: {}",
                    status.code().unwrap_or(-1)
                ),
                1,
            );
        }
        Ok(())
    }

    /// Run a git subcommand silently and return its stdout.
    fn capture(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.exec)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("failed to run git {}", args.join(" ")))?;
        if !output.status.success() {
            bail!("git {} exited with {}", args.join(" "), output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Latest commit id on `branch`, or [`UNKNOWN_COMMIT`] when `git show`
    /// output contains no 40-hex commit token.
    pub fn latest_commit_id(&self, branch: &str) -> Result<String> {
        Ok(parse_commit_id(&self.capture(&["show", branch])?))
    }

    /// All remote-reachable commit ids from `branch`, deduplicated with
    /// first-seen order preserved.
    pub fn commit_id_list(&self, branch: &str) -> Result<Vec<String>> {
        let output = self.capture(&["rev-list", "--remotes", branch])?;
        Ok(dedup_preserve_order(output.lines()))
    }

    /// Whether `git status --short` reports anything. A heuristic; it can
    /// miss states short status does not show.
    pub fn has_local_changes(&self) -> Result<bool> {
        Ok(!self.capture(&["status", "--short"])?.trim().is_empty())
    }

    /// FATAL (exit 104) unless the working directory has a `.git` directory
    /// and `git status` exits zero.
    pub fn verify_repo(&self) {
        let status_ok = Command::new(&self.exec)
            .arg("status")
            .current_dir(&self.workdir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if self.workdir.join(".git").is_dir() && status_ok {
            return;
        }

        self.logger.fatal(
            "git.verify_repo",
            "This Unity project does not seem to be tracked via Git, aborting.",
            EXIT_NOT_A_REPO,
        );
    }
}

/// Extract the first 40-hex commit id from `git show` output, or
/// [`UNKNOWN_COMMIT`] when none is present.
pub fn parse_commit_id(output: &str) -> String {
    COMMIT_RE
        .captures(output)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| UNKNOWN_COMMIT.to_string())
}

/// Deduplicate lines while preserving first-seen order.
pub fn dedup_preserve_order<'s, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in lines {
        if seen.insert(line) {
            out.push(line.to_string());
        }
    }
    out
}
