use anyhow::Result;
use std::env::consts;

use crate::context::{RunContext, TOOL_NAME};
use crate::editor::{editor_exec_path, launch_editor, project_editor_version};
use crate::git::Git;
use crate::logger::Logger;
use crate::prompt::confirm;

/// Synchronize the project with its remote branch and open it in the
/// matching Unity editor.
///
/// Strict linear sequence; every fatal condition terminates the process
/// before later steps run:
/// 1. Resolve the [`RunContext`] (exits 100/101/102 itself on failure) and
///    construct the logger.
/// 2. Verify the project is a git repository and that an editor matching
///    the recorded version is installed, before any remote work.
/// 3. Log a heads-up summary of everything resolved so far.
/// 4. Fetch (`remote update`), pull, and offer to push when the local tip
///    is not reachable from the remote.
/// 5. Launch the editor detached and return.
///
/// The "local tip missing from the remote's commit list" check is a
/// heuristic stand-in for ahead/behind detection, carried over as-is.
pub fn cmd_open() -> Result<()> {
    let ctx = RunContext::resolve();
    let logger = Logger::new(&ctx.log_dir, TOOL_NAME);
    let git = Git::new(&ctx.git_exec, &ctx.project_dir, &logger);

    git.verify_repo();
    let version = project_editor_version(&ctx, &logger);
    let editor_exec = editor_exec_path(&ctx, &logger, &version);

    logger.info(
        "open",
        &format!(
            "\n\
             Host Operating System           '{os}'\n\
             Git Executable Path             '{git_exec}'\n\
             Project Directory               '{project}'\n\
             Project Unity Version           '{version}'\n\
             Unity Editor Executable Path    '{editor}'\n\
             Current Project Commit          '{commit}'\n\
             Local Branch Name               '{local}'\n\
             Remote Branch Name              '{remote}'\n\
             Tool Log File                   '{log_file}'\n\
             Tool Version                    '{tool_version}'",
            os = consts::OS,
            git_exec = ctx.git_exec.display(),
            project = ctx.project_dir.display(),
            version = version,
            editor = editor_exec.display(),
            commit = git.latest_commit_id(ctx.local_branch)?,
            local = ctx.local_branch,
            remote = ctx.remote_branch,
            log_file = logger.log_file_path().display(),
            tool_version = env!("CARGO_PKG_VERSION"),
        ),
    );

    if git.has_local_changes()? {
        logger.info(
            "open",
            "Project directory has local changes that have not been committed",
        );
    }

    logger.info(
        "open",
        &format!(
            "Downloading latest changes from '{}'...",
            ctx.remote_branch
        ),
    );
    git.run(&["remote", "update"])?;

    logger.info(
        "open",
        &format!(
            "Attempting to pull latest changes into local branch '{}'...",
            ctx.local_branch
        ),
    );
    let remote_commits = git.commit_id_list(&ctx.remote_branch)?;
    if !remote_commits.contains(&git.latest_commit_id(ctx.local_branch)?)
        || git.has_local_changes()?
    {
        logger.info(
            "open",
            "Theres a good chance the pull will require manual review and / or merging, be prepared",
        );
    }
    git.run(&["pull"])?;

    let local_commit = git.latest_commit_id(ctx.local_branch)?;
    if !git.commit_id_list(&ctx.remote_branch)?.contains(&local_commit) {
        logger.info(
            "open",
            &format!(
                "Commit '{local_commit}' is not in '{}', likely needs to be pushed",
                ctx.remote_branch
            ),
        );
        let push = confirm(
            &logger,
            &format!(
                "Push local commit '{local_commit}' to '{}'?",
                ctx.remote_branch
            ),
        )?;
        if push {
            logger.info(
                "open",
                &format!("Pushing '{local_commit}' to '{}'...", ctx.remote_branch),
            );
            git.run(&["push"])?;
        }
    }

    launch_editor(&ctx, &logger, &version, &editor_exec)?;
    Ok(())
}
