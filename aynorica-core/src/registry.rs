//! Reading `.github/aynorica-registry.json`.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   .github/
//!     aynorica-registry.json   (network registry: read only)
//!     aynorica-config.json     (parent branch + remote)
//!     node-manifest.md         (marker: this workspace is a node)
//! ```
//!
//! # API pattern
//!
//! - `load_registry_at(root)`: typed errors; used by anything that wants to
//!   tell "missing" from "malformed".
//! - [`RegistryReader`]: the forgiving front door. Every failure is logged
//!   and becomes `None`. The file is re-read on every call.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{io_err, RegistryError};
use crate::git::GitRunner;
use crate::types::{NodeId, Registry};

pub const BRAIN_DIR: &str = ".github";
pub const REGISTRY_FILE: &str = "aynorica-registry.json";
pub const CONFIG_FILE: &str = "aynorica-config.json";
pub const MANIFEST_FILE: &str = "node-manifest.md";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<root>/.github/`: the tracked brain-state directory.
pub fn brain_dir_at(root: &Path) -> PathBuf {
    root.join(BRAIN_DIR)
}

/// `<root>/.github/aynorica-registry.json`: pure, no I/O.
pub fn registry_path_at(root: &Path) -> PathBuf {
    brain_dir_at(root).join(REGISTRY_FILE)
}

/// `<root>/.github/aynorica-config.json`: pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    brain_dir_at(root).join(CONFIG_FILE)
}

/// `<root>/.github/node-manifest.md`: pure, no I/O.
pub fn manifest_path_at(root: &Path) -> PathBuf {
    brain_dir_at(root).join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load and parse the registry under `root`.
///
/// Returns `RegistryError::RegistryNotFound` if absent,
/// `RegistryError::Parse` (with path) if malformed.
pub fn load_registry_at(root: &Path) -> Result<Registry, RegistryError> {
    let path = registry_path_at(root);
    if !path.exists() {
        return Err(RegistryError::RegistryNotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|source| RegistryError::Parse { path, source })
}

// ---------------------------------------------------------------------------
// 3. Reader
// ---------------------------------------------------------------------------

/// Reads the registry and maps the checked-out branch to a node.
#[derive(Clone)]
pub struct RegistryReader {
    root: PathBuf,
    registry_path: PathBuf,
    git: Rc<dyn GitRunner>,
}

impl RegistryReader {
    pub fn new(root: impl Into<PathBuf>, git: Rc<dyn GitRunner>) -> Self {
        let root = root.into();
        let registry_path = registry_path_at(&root);
        Self {
            root,
            registry_path,
            git,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn git(&self) -> &Rc<dyn GitRunner> {
        &self.git
    }

    /// Parsed registry, or `None` if it is missing or unreadable.
    pub fn read(&self) -> Option<Registry> {
        match load_registry_at(&self.root) {
            Ok(registry) => {
                for dangling in registry.dangling_references() {
                    tracing::warn!(path = %self.registry_path.display(), "{dangling}");
                }
                Some(registry)
            }
            Err(RegistryError::RegistryNotFound { path }) => {
                tracing::debug!(path = %path.display(), "registry not present");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to read registry");
                None
            }
        }
    }

    /// Node whose `branch` matches the checked-out branch.
    ///
    /// `None` when there is no registry, no branch (detached HEAD, not a
    /// repository) or no matching node.
    pub fn current_node(&self) -> Option<NodeId> {
        let branch = match self.git.current_branch() {
            Ok(Some(branch)) => branch,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to get current node");
                return None;
            }
        };
        let registry = self.read()?;
        registry.node_for_branch(&branch).cloned()
    }

    /// Registry plus the current node, read once each.
    pub fn snapshot(&self) -> Option<(Registry, Option<NodeId>)> {
        let registry = self.read()?;
        let current = match self.git.current_branch() {
            Ok(Some(branch)) => registry.node_for_branch(&branch).cloned(),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to get current node");
                None
            }
        };
        Some((registry, current))
    }
}

impl std::fmt::Debug for RegistryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryReader")
            .field("root", &self.root)
            .field("registry_path", &self.registry_path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
