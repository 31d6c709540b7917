//! Aynorica core library: network data model, registry reading, git seam.
//!
//! - [`types`]: newtypes and the registry document shape
//! - [`error`]: [`RegistryError`], [`GitError`]
//! - [`registry`]: path helpers, typed load, [`RegistryReader`]
//! - [`config`]: `.github/aynorica-config.json` and host settings
//! - [`git`]: the [`GitRunner`] seam and its shell implementation

pub mod config;
pub mod error;
pub mod git;
pub mod registry;
pub mod types;

pub use config::{ExtensionSettings, NetworkConfig};
pub use error::{GitError, RegistryError};
pub use git::{GitRunner, ShellGit};
pub use registry::RegistryReader;
pub use types::{DanglingReference, Node, NodeId, Registry};
