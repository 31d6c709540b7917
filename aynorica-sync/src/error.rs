//! Error types for aynorica-sync.

use thiserror::Error;

use aynorica_core::{GitError, RegistryError};
use aynorica_renderer::RenderError;

use crate::pipeline::GitStep;

/// All errors that can arise from sync and refresh operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A git step failed; the message is git's own, unedited.
    #[error("{source}")]
    Step {
        step: GitStep,
        #[source]
        source: GitError,
    },

    /// The registry or config file could not be loaded.
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl SyncError {
    /// The git step that failed, if this is a git failure.
    pub fn failed_step(&self) -> Option<GitStep> {
        match self {
            SyncError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub(crate) fn step_err(step: GitStep, source: GitError) -> SyncError {
    SyncError::Step { step, source }
}
