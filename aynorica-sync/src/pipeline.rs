//! Git sequences behind "sync brain state" and "refresh registry".
//!
//! Each sequence runs one command at a time and stops at the first failure.
//! Completed steps are never rolled back: a failed push leaves the commit.

use std::fmt;
use std::path::Path;

use aynorica_core::{config::load_config_at, registry::BRAIN_DIR, GitRunner};

use crate::error::{step_err, SyncError};

pub const SYNC_COMMIT_MESSAGE: &str = "chore: sync brain state";

/// One git invocation in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStep {
    Diff,
    Add,
    Commit,
    Push,
    Fetch,
    Rebase,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitStep::Diff => "diff",
            GitStep::Add => "add",
            GitStep::Commit => "commit",
            GitStep::Push => "push",
            GitStep::Fetch => "fetch",
            GitStep::Rebase => "rebase",
        };
        f.write_str(name)
    }
}

/// Result of [`sync_brain_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `git diff --quiet .github/` reported a clean tree; nothing was run.
    NoChanges,
    /// add, commit and push all succeeded.
    Synced,
}

/// Result of [`refresh_registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// `{remote}/{parentBranch}` that was rebased onto.
    pub upstream: String,
}

fn brain_pathspec() -> String {
    format!("{BRAIN_DIR}/")
}

/// Commit and push pending `.github/` changes.
///
/// `on_step` is called before each mutating step.
pub fn sync_brain_state(
    git: &dyn GitRunner,
    on_step: &mut dyn FnMut(GitStep),
) -> Result<SyncOutcome, SyncError> {
    let pathspec = brain_pathspec();

    // --quiet exits 1 when the tracked files differ.
    match git.run(&["diff", "--quiet", pathspec.as_str()]) {
        Ok(_) => {
            tracing::info!("no brain state changes under {pathspec}");
            return Ok(SyncOutcome::NoChanges);
        }
        Err(err) if err.exit_code() == Some(1) => {}
        Err(err) => return Err(step_err(GitStep::Diff, err)),
    }

    let steps: [(GitStep, Vec<&str>); 3] = [
        (GitStep::Add, vec!["add", pathspec.as_str()]),
        (GitStep::Commit, vec!["commit", "-m", SYNC_COMMIT_MESSAGE]),
        (GitStep::Push, vec!["push"]),
    ];
    for (step, args) in steps {
        on_step(step);
        git.run(&args).map_err(|err| {
            tracing::warn!("brain state sync stopped at {step}: {err}");
            step_err(step, err)
        })?;
    }

    tracing::info!("brain state synced");
    Ok(SyncOutcome::Synced)
}

/// Fetch the parent branch and rebase onto it.
///
/// Reads `parentBranch` and `remote.name` from `.github/aynorica-config.json`
/// under `root`; a missing config is an error.
pub fn refresh_registry(
    root: &Path,
    git: &dyn GitRunner,
    on_step: &mut dyn FnMut(GitStep),
) -> Result<RefreshOutcome, SyncError> {
    let config = load_config_at(root)?;
    let remote = config.remote_name();
    let parent = config.parent_branch();
    let upstream = config.upstream();

    on_step(GitStep::Fetch);
    git.run(&["fetch", remote, parent])
        .map_err(|err| step_err(GitStep::Fetch, err))?;

    on_step(GitStep::Rebase);
    git.run(&["rebase", upstream.as_str()])
        .map_err(|err| step_err(GitStep::Rebase, err))?;

    tracing::info!("registry refreshed from {upstream}");
    Ok(RefreshOutcome { upstream })
}
