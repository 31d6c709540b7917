//! The seam between Aynorica and the `git` executable.
//!
//! Every command runs synchronously with the workspace root as its working
//! directory. Nothing is retried.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::GitError;

/// Runs one git command and returns its trimmed stdout.
pub trait GitRunner {
    fn run(&self, args: &[&str]) -> Result<String, GitError>;

    /// `git branch --show-current`. Empty output (detached HEAD) maps to `None`.
    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let branch = self.run(&["branch", "--show-current"])?;
        Ok(if branch.is_empty() { None } else { Some(branch) })
    }
}

/// Spawns the real `git` binary.
#[derive(Debug, Clone)]
pub struct ShellGit {
    root: PathBuf,
}

impl ShellGit {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GitRunner for ShellGit {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = display_command(args);
        tracing::debug!(%command, root = %self.root.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        Err(GitError::Failed {
            command,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        })
    }
}

/// `git <args…>` as the user would type it.
pub fn display_command(args: &[&str]) -> String {
    let mut parts = vec!["git".to_string()];
    for arg in args {
        if arg.contains(' ') {
            parts.push(format!("\"{arg}\""));
        } else {
            parts.push((*arg).to_string());
        }
    }
    parts.join(" ")
}
