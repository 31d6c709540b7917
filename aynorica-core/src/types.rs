//! Domain types for the Aynorica network registry.
//!
//! The registry is a JSON document owned by git; nothing here writes it.
//! Field names follow the on-disk camelCase spelling.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Key of a node in [`Registry::nodes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One branch in the tracked network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub branch: String,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    /// ISO-8601 timestamp, kept as written; parsing happens at display time.
    #[serde(default)]
    pub last_sync: String,
}

/// Root of `.github/aynorica-registry.json`.
///
/// `nodes` preserves the key order of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// Empty when the file omits `primeNode`.
    #[serde(default)]
    pub prime_node: NodeId,
    #[serde(default)]
    pub nodes: IndexMap<NodeId, Node>,
}

/// A lineage reference that names a node missing from [`Registry::nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    Prime { missing: NodeId },
    Parent { node: NodeId, missing: NodeId },
    Child { node: NodeId, missing: NodeId },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DanglingReference::Prime { missing } if missing.as_str().is_empty() => {
                f.write_str("primeNode is not set")
            }
            DanglingReference::Prime { missing } => {
                write!(f, "primeNode '{missing}' is not a registered node")
            }
            DanglingReference::Parent { node, missing } => {
                write!(f, "node '{node}' names unknown parent '{missing}'")
            }
            DanglingReference::Child { node, missing } => {
                write!(f, "node '{node}' names unknown child '{missing}'")
            }
        }
    }
}

impl Registry {
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node (in file order) whose `branch` equals `branch`.
    pub fn node_for_branch(&self, branch: &str) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.branch == branch)
            .map(|(id, _)| id)
    }

    /// Every prime/parent/child reference that does not resolve to a key.
    ///
    /// Dangling references are tolerated data, not errors.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&self.prime_node) {
            out.push(DanglingReference::Prime {
                missing: self.prime_node.clone(),
            });
        }
        for (id, node) in &self.nodes {
            if let Some(parent) = &node.parent {
                if !self.nodes.contains_key(parent) {
                    out.push(DanglingReference::Parent {
                        node: id.clone(),
                        missing: parent.clone(),
                    });
                }
            }
            for child in &node.children {
                if !self.nodes.contains_key(child) {
                    out.push(DanglingReference::Child {
                        node: id.clone(),
                        missing: child.clone(),
                    });
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
