pub mod actions;
pub mod status;
pub mod watch;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use aynorica_core::{RegistryReader, ShellGit};
use aynorica_detector::{detect_node, NodeWorkspace};

/// A detected node workspace and a reader over its registry.
pub struct Workspace {
    pub node: NodeWorkspace,
    pub reader: RegistryReader,
}

/// Resolve `root` and make sure it is an Aynorica node.
pub fn open_workspace(root: &Path) -> Result<Workspace> {
    let root = resolve_root(root)?;
    let node = detect_node(&root)?;
    let git = Rc::new(ShellGit::new(root.clone()));
    Ok(Workspace {
        node,
        reader: RegistryReader::new(root, git),
    })
}

pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize()
        .with_context(|| format!("cannot resolve path '{}'", root.display()))
}
