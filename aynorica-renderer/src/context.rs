//! Template context: serializable rendering payload built from [`Registry`].

use serde::{Deserialize, Serialize};

use aynorica_core::{Node, NodeId, Registry};

use crate::error::RenderError;

pub const ROOT_PARENT: &str = "None (root)";
pub const NO_CHILDREN: &str = "None";

/// How a node is flagged in the report. `Current` wins over the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMarker {
    Current,
    Parent,
    Leaf,
}

impl NodeMarker {
    pub fn classify(id: &NodeId, node: &Node, current: Option<&NodeId>) -> Self {
        if current == Some(id) {
            NodeMarker::Current
        } else if !node.children.is_empty() {
            NodeMarker::Parent
        } else {
            NodeMarker::Leaf
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NodeMarker::Current => "📍",
            NodeMarker::Parent => "📦",
            NodeMarker::Leaf => "📄",
        }
    }
}

/// Whole-report payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkContext {
    pub total: usize,
    pub prime: String,
    /// One entry per registry node, in file order.
    pub nodes: Vec<NodeCtx>,
}

/// One node block, with display strings already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCtx {
    pub id: String,
    pub marker: NodeMarker,
    pub icon: String,
    pub is_current: bool,
    pub branch: String,
    pub parent: String,
    pub children: String,
    pub status: String,
    pub description: String,
    pub last_sync: String,
}

impl NetworkContext {
    pub fn build(registry: &Registry, current: Option<&NodeId>) -> Self {
        let nodes = registry
            .nodes
            .iter()
            .map(|(id, node)| NodeCtx::build(id, node, current))
            .collect();
        Self {
            total: registry.node_count(),
            prime: registry.prime_node.to_string(),
            nodes,
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

impl NodeCtx {
    fn build(id: &NodeId, node: &Node, current: Option<&NodeId>) -> Self {
        let marker = NodeMarker::classify(id, node, current);
        let children = if node.children.is_empty() {
            NO_CHILDREN.to_string()
        } else {
            node.children
                .iter()
                .map(NodeId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            id: id.to_string(),
            marker,
            icon: marker.icon().to_string(),
            is_current: marker == NodeMarker::Current,
            branch: node.branch.clone(),
            parent: node
                .parent
                .as_ref()
                .filter(|p| !p.as_str().is_empty())
                .map(NodeId::to_string)
                .unwrap_or_else(|| ROOT_PARENT.to_string()),
            children,
            status: node.status.clone(),
            description: node.description.clone(),
            last_sync: node.last_sync.clone(),
        }
    }
}
