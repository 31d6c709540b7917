//! Error types for aynorica-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while reading the registry or config files.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure (permission denied, is a directory, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, or JSON that does not match the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `.github/aynorica-registry.json` does not exist.
    #[error("registry not found at {path}")]
    RegistryNotFound { path: PathBuf },

    /// `.github/aynorica-config.json` does not exist.
    #[error("aynorica-config.json not found at {path}")]
    ConfigNotFound { path: PathBuf },
}

/// A failed git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` process could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited unsuccessfully. `stderr` is kept verbatim.
    #[error("Command failed: {command}\n{stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl GitError {
    /// Exit code of a failed command, if git ran and reported one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::Failed { code, .. } => *code,
            GitError::Spawn { .. } => None,
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
