use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Identity used for the session log file name and the heads-up summary.
pub const TOOL_NAME: &str = "unity-launch";

/// The single branch this tool synchronizes. The remote counterpart is
/// always `origin/<LOCAL_BRANCH>`.
pub const LOCAL_BRANCH: &str = "master";

/// Host operating systems this tool is allowed to run on.
const SUPPORTED_PLATFORMS: &[&str] = &["linux"];

/// Sentinel file used to probe directory writability. Created and removed
/// again by [`dir_is_writable`].
const WRITE_PROBE_NAME: &str = "DIR_WRITE_TEST.TESTING_123";

pub const EXIT_GIT_NOT_FOUND: i32 = 100;
pub const EXIT_BAD_PROJECT_DIR: i32 = 101;
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 102;
pub const EXIT_NO_EDITOR_VERSION: i32 = 103;
pub const EXIT_NOT_A_REPO: i32 = 104;
pub const EXIT_NO_EDITOR_INSTALL: i32 = 105;

/// Process-wide configuration resolved once at startup.
///
/// Every field is filled in by [`RunContext::resolve`] and never mutated
/// afterwards; functions that need configuration take `&RunContext`.
pub struct RunContext {
    /// Absolute path of the `git` binary found on PATH.
    pub git_exec: PathBuf,
    /// Unity project root (the directory containing this executable).
    pub project_dir: PathBuf,
    /// Directory session and editor log files are written to.
    pub log_dir: PathBuf,
    /// Root directory containing one subdirectory per installed editor version.
    pub editor_root: PathBuf,
    pub local_branch: &'static str,
    pub remote_branch: String,
}

impl RunContext {
    /// Validate the environment and resolve all startup configuration.
    ///
    /// Runs before the logger exists, so every failure here prints to stdout
    /// and exits the process directly:
    /// - unsupported host OS → exit 102
    /// - `git` not found on PATH → exit 100
    /// - executable not inside a writable Unity project directory → exit 101
    ///
    /// The log directory prefers `<project>/Logs` (created if missing) and
    /// falls back to the system temp directory when that is unusable.
    pub fn resolve() -> RunContext {
        if !platform_supported(env::consts::OS) {
            println!(
                "Platform '{}' is not supported by this tool",
                env::consts::OS
            );
            process::exit(EXIT_UNSUPPORTED_PLATFORM);
        }

        let git_exec = match which::which("git") {
            Ok(p) => p,
            Err(_) => {
                println!("Git is not installed on this system or could not be located, aborting.");
                process::exit(EXIT_GIT_NOT_FOUND);
            }
        };

        let project_dir = match executable_dir() {
            Some(dir) if is_project_dir(&dir) => dir,
            _ => {
                println!(
                    "This tool does not seem to be located in a valid Unity project directory, aborting."
                );
                process::exit(EXIT_BAD_PROJECT_DIR);
            }
        };

        let log_dir = select_log_dir(&project_dir);

        RunContext {
            git_exec,
            log_dir,
            editor_root: editor_install_root(),
            local_branch: LOCAL_BRANCH,
            remote_branch: format!("origin/{LOCAL_BRANCH}"),
            project_dir,
        }
    }

    /// Path of `ProjectSettings/ProjectVersion.txt` inside the project.
    pub fn project_version_file(&self) -> PathBuf {
        version_file_in(&self.project_dir)
    }
}

/// Whether the given `std::env::consts::OS` value is in the allow-list.
pub fn platform_supported(os: &str) -> bool {
    SUPPORTED_PLATFORMS.contains(&os)
}

fn version_file_in(dir: &Path) -> PathBuf {
    dir.join("ProjectSettings").join("ProjectVersion.txt")
}

/// Directory containing the currently running executable, canonicalized.
fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let exe = exe.canonicalize().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// A directory is a Unity project root when it holds the version file and
/// is writable (log files and editor artifacts land there).
pub fn is_project_dir(dir: &Path) -> bool {
    version_file_in(dir).is_file() && dir_is_writable(dir)
}

/// Probe a directory for writability by creating and deleting a sentinel
/// file. The probe file is removed in both outcomes.
pub fn dir_is_writable(dir: &Path) -> bool {
    let probe = dir.join(WRITE_PROBE_NAME);
    let ok = fs::write(&probe, "test").is_ok();
    if probe.is_file() {
        let _ = fs::remove_file(&probe);
    }
    ok
}

/// Pick the directory log files are written to.
///
/// Prefers `<project>/Logs`, creating it when missing. Falls back to the
/// system temp directory when the preferred directory cannot be created,
/// is not a directory, or is not writable.
pub fn select_log_dir(project_dir: &Path) -> PathBuf {
    let preferred = project_dir.join("Logs");

    if !preferred.exists() {
        let _ = fs::create_dir_all(&preferred);
    }

    if preferred.is_dir() && dir_is_writable(&preferred) {
        preferred
    } else {
        env::temp_dir()
    }
}

/// Fixed per-user editor installation root: `~/.local/share/unity-editor`.
fn editor_install_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".local")
        .join("share")
        .join("unity-editor")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn platform_allow_list_only_matches_linux() {
        assert!(platform_supported("linux"));
        assert!(!platform_supported("windows"));
        assert!(!platform_supported("macos"));
        assert!(!platform_supported(""));
    }

    #[test]
    fn writable_dir_probe_succeeds_and_cleans_up() {
        let td = tempdir().unwrap();
        assert!(dir_is_writable(td.path()));
        assert!(!td.path().join(WRITE_PROBE_NAME).exists());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_dir_probe_fails_and_leaves_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempdir().unwrap();
        let dir = td.path().join("ro");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        let writable = dir_is_writable(&dir);
        let probe_left = dir.join(WRITE_PROBE_NAME).exists();

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(!writable);
        assert!(!probe_left);
    }

    #[test]
    fn log_dir_prefers_logs_subdirectory_and_creates_it() {
        let td = tempdir().unwrap();
        let picked = select_log_dir(td.path());
        assert_eq!(picked, td.path().join("Logs"));
        assert!(picked.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn log_dir_falls_back_to_temp_when_project_is_read_only() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempdir().unwrap();
        let project = td.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::set_permissions(&project, fs::Permissions::from_mode(0o555)).unwrap();

        let picked = select_log_dir(&project);

        fs::set_permissions(&project, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(picked, env::temp_dir());
    }

    #[test]
    fn project_dir_requires_version_file() {
        let td = tempdir().unwrap();
        assert!(!is_project_dir(td.path()));

        fs::create_dir_all(td.path().join("ProjectSettings")).unwrap();
        fs::write(
            version_file_in(td.path()),
            "m_EditorVersion: 2019.2.11f1\n",
        )
        .unwrap();
        assert!(is_project_dir(td.path()));
    }
}
