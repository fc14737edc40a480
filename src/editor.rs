use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::context::{EXIT_NO_EDITOR_INSTALL, EXIT_NO_EDITOR_VERSION, RunContext};
use crate::logger::{Logger, log_file_name};

/// Key prefix of the version line in `ProjectSettings/ProjectVersion.txt`.
const EDITOR_VERSION_KEY: &str = "m_EditorVersion: ";

/// Extract the editor version from ProjectVersion.txt content.
///
/// Returns the trimmed value after [`EDITOR_VERSION_KEY`] on the first line
/// containing it, or `None` when no line matches.
pub fn parse_editor_version(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        line.split_once(EDITOR_VERSION_KEY)
            .map(|(_, value)| value.trim().to_string())
    })
}

/// Editor version recorded in the project. FATAL (exit 103) when the version
/// file is unreadable or carries no version line.
pub fn project_editor_version(ctx: &RunContext, logger: &Logger) -> String {
    let path = ctx.project_version_file();
    if let Ok(text) = fs::read_to_string(&path)
        && let Some(version) = parse_editor_version(&text)
    {
        return version;
    }

    logger.fatal(
        "editor.version",
        "Unable to determine project's Unity version",
        EXIT_NO_EDITOR_VERSION,
    )
}

/// Expected binary location for an installed editor version:
/// `<root>/<version>/Editor/Unity`.
pub fn editor_exec_candidate(root: &Path, version: &str) -> PathBuf {
    root.join(version).join("Editor").join("Unity")
}

/// Path of the editor binary matching `version`. FATAL (exit 105) when no
/// such installation exists.
pub fn editor_exec_path(ctx: &RunContext, logger: &Logger, version: &str) -> PathBuf {
    let exec = editor_exec_candidate(&ctx.editor_root, version);
    if exec.is_file() {
        return exec;
    }

    logger.fatal(
        "editor.resolve",
        &format!(
            "Unable to locate Unity Editor installation for project's Unity version '{version}'"
        ),
        EXIT_NO_EDITOR_INSTALL,
    )
}

/// Launch the editor on the project, detached.
///
/// The editor gets its own timestamped log file in the log directory, passed
/// via `-logFile`. The child is deliberately not waited on; the launcher
/// exits while the editor keeps running.
pub fn launch_editor(
    ctx: &RunContext,
    logger: &Logger,
    version: &str,
    editor_exec: &Path,
) -> Result<()> {
    let editor_log = ctx
        .log_dir
        .join(log_file_name(&format!("UnityEditor.v{version}")));

    logger.info(
        "editor.launch",
        &format!(
            "Opening project in Unity editor. Editor log file: '{}'",
            editor_log.display()
        ),
    );

    Command::new(editor_exec)
        .arg("-projectPath")
        .arg(&ctx.project_dir)
        .arg("-logFile")
        .arg(&editor_log)
        .current_dir(&ctx.project_dir)
        .spawn()
        .with_context(|| format!("failed to launch Unity editor: {}", editor_exec.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn version_is_taken_from_first_matching_line() {
        let text = "m_EditorVersion: 2019.2.11f1\n\
                    m_EditorVersionWithRevision: 2019.2.11f1 (5f859a4cfee5)\n";
        assert_eq!(parse_editor_version(text).as_deref(), Some("2019.2.11f1"));
    }

    #[test]
    fn version_value_is_trimmed() {
        assert_eq!(
            parse_editor_version("m_EditorVersion: 2021.3.4f1   \n").as_deref(),
            Some("2021.3.4f1")
        );
    }

    #[test]
    fn missing_key_yields_none() {
        assert!(parse_editor_version("").is_none());
        assert!(parse_editor_version("m_SomethingElse: 1.2.3\n").is_none());
    }

    #[test]
    fn exec_candidate_follows_installation_layout() {
        let td = tempdir().unwrap();
        let root = td.path();

        let candidate = editor_exec_candidate(root, "2019.2.11f1");
        assert_eq!(candidate, root.join("2019.2.11f1/Editor/Unity"));
        assert!(!candidate.is_file());

        fs::create_dir_all(candidate.parent().unwrap()).unwrap();
        fs::write(&candidate, "").unwrap();
        assert!(candidate.is_file());
    }
}
