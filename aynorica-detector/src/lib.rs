//! Node workspace detection for `aynorica-detector`.
//!
//! `detect_node(path)` inspects the marker files under `<path>/.github/` and
//! reports whether the workspace takes part in an Aynorica network. A
//! workspace participates when it carries `node-manifest.md` or
//! `aynorica-config.json`; the registry alone is not enough.

use std::path::{Path, PathBuf};

use aynorica_core::registry::{config_path_at, manifest_path_at, registry_path_at};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which marker made the workspace a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Manifest,
    Config,
    Both,
}

/// Marker files found in a node workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWorkspace {
    pub root: PathBuf,
    pub marker: Marker,
    /// Whether `aynorica-registry.json` is present. A node without a
    /// registry is detected but "not initialized".
    pub has_registry: bool,
}

/// Errors from node detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{path}' is not an Aynorica workspace: no .github/node-manifest.md or .github/aynorica-config.json")]
    NotANode { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Detect whether `path` is an Aynorica node workspace.
pub fn detect_node(path: &Path) -> Result<NodeWorkspace, DetectError> {
    let has_manifest = is_file(&manifest_path_at(path))?;
    let has_config = is_file(&config_path_at(path))?;

    let marker = match (has_manifest, has_config) {
        (true, true) => Marker::Both,
        (true, false) => Marker::Manifest,
        (false, true) => Marker::Config,
        (false, false) => {
            return Err(DetectError::NotANode {
                path: path.to_path_buf(),
            })
        }
    };

    Ok(NodeWorkspace {
        root: path.to_path_buf(),
        marker,
        has_registry: is_file(&registry_path_at(path))?,
    })
}

/// `true` when [`detect_node`] would succeed.
pub fn is_node(path: &Path) -> bool {
    detect_node(path).is_ok()
}

fn is_file(path: &Path) -> Result<bool, DetectError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
